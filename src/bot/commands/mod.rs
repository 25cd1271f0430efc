//! Prefix commands of the help desk.

/// Posting the guide and the creation prompt
pub mod guide;

/// Commands used inside help threads
pub mod thread;

pub use guide::*;
pub use thread::*;

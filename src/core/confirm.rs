//! Timed yes/no gate in front of thread creation.
//!
//! The gate waits for one answer or for the window to run out, whichever
//! comes first. Both are resolutions of the same wait, so exactly one outcome
//! is ever produced.

use std::future::Future;
use std::time::Duration;

/// How long the requester has to answer.
pub const CONFIRM_WINDOW: Duration = Duration::from_secs(10);

/// Question shown on the prompt.
pub const CONFIRM_PROMPT: &str = "Are you really sure you want to make a help thread?";

/// Result of the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The requester pressed "Yes"
    Affirmed,
    /// The requester pressed "No"
    Declined,
    /// Nobody answered within the window
    TimedOut,
}

impl Confirmation {
    /// Maps an explicit answer; `None` means the wait ended without one.
    #[must_use]
    pub const fn from_answer(answer: Option<bool>) -> Self {
        match answer {
            Some(true) => Self::Affirmed,
            Some(false) => Self::Declined,
            None => Self::TimedOut,
        }
    }

    /// Only an explicit "Yes" creates a thread.
    #[must_use]
    pub const fn proceeds(self) -> bool {
        matches!(self, Self::Affirmed)
    }

    /// Text that replaces the prompt once it is resolved.
    #[must_use]
    pub fn resolution_text(self) -> String {
        match self {
            Self::Affirmed => "Created!".to_string(),
            Self::Declined => "Ok, cancelled.".to_string(),
            Self::TimedOut => format!("~~{CONFIRM_PROMPT}~~ I guess not..."),
        }
    }
}

/// Waits for `answer` for at most `window`.
///
/// `answer` resolves to `Some(true)` for yes, `Some(false)` for no, or `None`
/// if its source went away without an answer.
pub async fn await_confirmation<F>(answer: F, window: Duration) -> Confirmation
where
    F: Future<Output = Option<bool>>,
{
    match tokio::time::timeout(window, answer).await {
        Ok(answer) => Confirmation::from_answer(answer),
        Err(_) => {
            tracing::debug!(?window, "Confirmation window elapsed without an answer");
            Confirmation::TimedOut
        }
    }
}

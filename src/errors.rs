//! Unified error types for the help desk bot.
//!
//! Permission and lookup failures are ordinary, user-facing outcomes and get
//! their own variants so the bot layer can answer them without escalating.
//! Everything coming out of serenity is boxed into [`Error::Framework`].

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The invoker is not allowed to perform `action` on a help thread.
    #[error("You do not have permission to {action}.")]
    PermissionDenied {
        /// The refused action, e.g. "close this thread"
        action: &'static str,
    },

    /// A thread, message or other platform resource could not be resolved.
    #[error("Could not find {what}")]
    NotFound {
        /// Human readable description of the missing resource
        what: String,
    },

    /// User input that cannot be applied, e.g. an empty thread topic.
    #[error("{message}")]
    InvalidInput {
        /// Explanation shown to the invoker
        message: String,
    },

    /// I/O error while reading configuration or the help guide.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error reported by serenity or poise.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<serenity::Error>),
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] with a formatted description.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Whether this error is an expected, user-facing outcome rather than a
    /// failure worth logging at error level.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::NotFound { .. } | Self::InvalidInput { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message_names_action() {
        let err = Error::PermissionDenied {
            action: "re-open this thread",
        };
        assert_eq!(
            err.to_string(),
            "You do not have permission to re-open this thread."
        );
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_config_error_is_not_user_facing() {
        let err = Error::Config {
            message: "missing [help] table".to_string(),
        };
        assert!(!err.is_user_facing());
        assert!(err.to_string().contains("missing [help] table"));
    }
}

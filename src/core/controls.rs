//! Custom ids of the persistent help desk buttons.
//!
//! Every id starts with [`CUSTOM_ID_PREFIX`] and is fixed, so a button posted
//! before a restart still maps to the same handler afterwards.

/// Prefix shared by every help desk custom id.
pub const CUSTOM_ID_PREFIX: &str = "help:";

/// A parsed help desk button.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    /// Creation prompt button for a category
    Create(String),
    /// "Yes" on the confirmation prompt
    Confirm,
    /// "No" on the confirmation prompt
    Decline,
    /// Close button pinned in the thread
    ThreadClose,
    /// "View" on a log message
    LogView,
    /// "Close" on a log message
    LogClose,
    /// "Re-open" on a log message
    LogReopen,
}

/// Handler key for a [`Control`]; category payloads do not matter for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// See [`Control::Create`]
    Create,
    /// See [`Control::Confirm`]
    Confirm,
    /// See [`Control::Decline`]
    Decline,
    /// See [`Control::ThreadClose`]
    ThreadClose,
    /// See [`Control::LogView`]
    LogView,
    /// See [`Control::LogClose`]
    LogClose,
    /// See [`Control::LogReopen`]
    LogReopen,
}

impl ControlKind {
    /// Every kind, for building the handler registry.
    pub const ALL: [Self; 7] = [
        Self::Create,
        Self::Confirm,
        Self::Decline,
        Self::ThreadClose,
        Self::LogView,
        Self::LogClose,
        Self::LogReopen,
    ];
}

impl Control {
    /// The custom id to put on the button.
    #[must_use]
    pub fn custom_id(&self) -> String {
        let suffix = match self {
            Self::Create(category) => return format!("{CUSTOM_ID_PREFIX}create:{category}"),
            Self::Confirm => "confirm_button",
            Self::Decline => "decline_button",
            Self::ThreadClose => "thread_close",
            Self::LogView => "log_view",
            Self::LogClose => "log_close",
            Self::LogReopen => "log_reopen",
        };
        format!("{CUSTOM_ID_PREFIX}{suffix}")
    }

    /// Parses a custom id; anything without the prefix or unknown is `None`.
    #[must_use]
    pub fn parse(custom_id: &str) -> Option<Self> {
        let rest = custom_id.strip_prefix(CUSTOM_ID_PREFIX)?;
        if let Some(category) = rest.strip_prefix("create:") {
            return (!category.is_empty()).then(|| Self::Create(category.to_string()));
        }
        match rest {
            "confirm_button" => Some(Self::Confirm),
            "decline_button" => Some(Self::Decline),
            "thread_close" => Some(Self::ThreadClose),
            "log_view" => Some(Self::LogView),
            "log_close" => Some(Self::LogClose),
            "log_reopen" => Some(Self::LogReopen),
            _ => None,
        }
    }

    /// Handler key.
    #[must_use]
    pub const fn kind(&self) -> ControlKind {
        match self {
            Self::Create(_) => ControlKind::Create,
            Self::Confirm => ControlKind::Confirm,
            Self::Decline => ControlKind::Decline,
            Self::ThreadClose => ControlKind::ThreadClose,
            Self::LogView => ControlKind::LogView,
            Self::LogClose => ControlKind::LogClose,
            Self::LogReopen => ControlKind::LogReopen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ids() {
        assert_eq!(Control::Confirm.custom_id(), "help:confirm_button");
        assert_eq!(Control::Decline.custom_id(), "help:decline_button");
        assert_eq!(Control::ThreadClose.custom_id(), "help:thread_close");
        assert_eq!(
            Control::Create("python".to_string()).custom_id(),
            "help:create:python"
        );
    }

    #[test]
    fn test_parse_every_kind() {
        for control in [
            Control::Create("nextcord".to_string()),
            Control::Confirm,
            Control::Decline,
            Control::ThreadClose,
            Control::LogView,
            Control::LogClose,
            Control::LogReopen,
        ] {
            assert_eq!(Control::parse(&control.custom_id()), Some(control));
        }
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert_eq!(Control::parse("ticket:close"), None);
        assert_eq!(Control::parse("help:unknown"), None);
        assert_eq!(Control::parse("help:create:"), None);
    }

    #[test]
    fn test_kind_ignores_category() {
        assert_eq!(
            Control::Create("a".to_string()).kind(),
            Control::Create("b".to_string()).kind()
        );
        assert_eq!(ControlKind::ALL.len(), 7);
    }
}

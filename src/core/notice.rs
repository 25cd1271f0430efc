//! Plain-data messages produced by the lifecycle manager.
//!
//! The bot layer turns these into embeds and buttons; keeping them free of
//! serenity builders lets the lifecycle be tested without a gateway.

use crate::core::platform::{LifecycleState, ThreadSnapshot};
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{ChannelId, GuildId, RoleId, UserId};
use std::fmt::Write;

/// Title of the embed posted when a thread closes. Re-opening looks for it.
pub const CLOSING_NOTICE_TITLE: &str = "This thread has now been closed";

/// Body of the closing notice and of the closing DM.
pub const CLOSING_GUIDANCE: &str = "If your question has not been answered or your issue not \
    resolved, we suggest taking a look at [Python's Guide to Asking Good Questions]\
    (https://www.pythondiscord.com/pages/guides/pydis-guides/asking-good-questions/) \
    to get more effective help.";

/// Which transition a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Thread created
    Opened,
    /// Thread locked and archived
    Closed,
    /// Thread unlocked and unarchived
    Reopened,
}

impl LogKind {
    /// Embed title for the log message.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Opened => "Help thread opened",
            Self::Closed => "Help thread closed",
            Self::Reopened => "Help thread re-opened",
        }
    }

    /// State the thread is in after this transition.
    #[must_use]
    pub const fn resulting_state(self) -> LifecycleState {
        match self {
            Self::Opened | Self::Reopened => LifecycleState::Open,
            Self::Closed => LifecycleState::Closed,
        }
    }
}

/// How a transition was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// A text command inside the thread
    Command,
    /// A button inside the thread or on the creation prompt
    Button,
    /// A button on a log message
    LogButton,
    /// The author left or was removed from the thread
    AuthorLeft,
}

impl Method {
    /// Trailing phrase for log descriptions.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Command => "using the command",
            Self::Button => "using the button",
            Self::LogButton => "using the button in logs",
            Self::AuthorLeft => "automatically, the author left the thread",
        }
    }
}

/// The thread a log entry refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    /// Thread id
    pub id: ChannelId,
    /// Guild id, for jump links
    pub guild_id: GuildId,
    /// Thread name at the time of the transition
    pub name: String,
}

impl From<&ThreadSnapshot> for ThreadRef {
    fn from(thread: &ThreadSnapshot) -> Self {
        Self {
            id: thread.id,
            guild_id: thread.guild_id,
            name: thread.name.clone(),
        }
    }
}

impl ThreadRef {
    /// Link that opens the thread in the Discord client.
    #[must_use]
    pub fn jump_url(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}",
            self.guild_id, self.id
        )
    }
}

/// One audit record in the log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Which transition happened
    pub kind: LogKind,
    /// The affected thread
    pub thread: ThreadRef,
    /// The user the thread belongs to, when the intro still names them
    pub author: Option<UserId>,
    /// Who triggered a close or re-open
    pub actor: Option<UserId>,
    /// How it was triggered
    pub method: Method,
    /// When it was recorded
    pub at: DateTime<Utc>,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        kind: LogKind,
        thread: &ThreadSnapshot,
        author: Option<UserId>,
        actor: Option<UserId>,
        method: Method,
    ) -> Self {
        Self {
            kind,
            thread: thread.into(),
            author,
            actor,
            method,
            at: Utc::now(),
        }
    }

    /// Markdown body of the log embed.
    #[must_use]
    pub fn description(&self) -> String {
        let mut text = match self.author {
            Some(author) => format!(
                "**Thread:** <#{thread}>\n**Author:** <@{author}> ({author})",
                thread = self.thread.id
            ),
            None => format!("**Thread:** <#{}>\n**Author:** unknown", self.thread.id),
        };
        if let Some(actor) = self.actor {
            let verb = match self.kind {
                LogKind::Opened => "Opened by",
                LogKind::Closed => "Closed by",
                LogKind::Reopened => "Re-opened by",
            };
            // Writing into a String cannot fail.
            let _ = write!(
                text,
                "\n\n**{verb}:** <@{actor}> ({actor}) {}",
                self.method.describe()
            );
        }
        text
    }

    /// Footer text; the thread id in it lets log buttons find their thread
    /// after a restart.
    #[must_use]
    pub fn footer(&self) -> String {
        footer_for(self.thread.id)
    }
}

/// Footer text carrying a thread id.
#[must_use]
pub fn footer_for(thread: ChannelId) -> String {
    format!("ID: {thread}")
}

/// Recovers the thread id from a log embed footer.
#[must_use]
pub fn parse_footer(footer: &str) -> Option<ChannelId> {
    let (_, id) = footer.split_once("ID:")?;
    let id = id.trim().parse::<u64>().ok()?;
    (id != 0).then(|| ChannelId::new(id))
}

/// The embed posted inside a thread as it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosingNotice {
    /// Embed title
    pub title: &'static str,
    /// Embed body
    pub description: &'static str,
}

impl Default for ClosingNotice {
    fn default() -> Self {
        Self {
            title: CLOSING_NOTICE_TITLE,
            description: CLOSING_GUIDANCE,
        }
    }
}

/// Direct message sent to the author of a closed thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedDm {
    /// Link back to the archived thread
    pub thread_url: String,
    /// Name of the closed thread
    pub thread_name: String,
}

impl ClosedDm {
    /// Embed title for the DM.
    pub const TITLE: &'static str = "Your help thread has been closed.";

    /// Markdown body for the DM.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{CLOSING_GUIDANCE}\n\nYou can use [**this link**]({}) to access the archived thread **{}** for future reference",
            self.thread_url, self.thread_name
        )
    }
}

/// First message of a new help thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroMessage {
    /// Role pinged so helpers notice the thread
    pub helper_role: RoleId,
    /// The requester, mentioned so the thread records its author
    pub author: UserId,
    /// Category label, e.g. "Python"
    pub category: String,
}

impl IntroMessage {
    /// Plain content line. The author must be the only user mention.
    #[must_use]
    pub fn content(&self) -> String {
        format!("<@&{}> | <@{}>", self.helper_role, self.author)
    }

    /// Embed title.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} Help needed!", self.category)
    }

    /// Embed body.
    pub const DESCRIPTION: &'static str =
        "Alright now that we are all here to help, what do you need help with?";

    /// Embed footer.
    pub const FOOTER: &'static str = "You and the helpers can close this thread with the button";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> ThreadSnapshot {
        ThreadSnapshot {
            id: ChannelId::new(555),
            guild_id: GuildId::new(1),
            parent_id: Some(ChannelId::new(100)),
            name: "Python help (123)".to_string(),
            archived: false,
            locked: false,
            private: true,
        }
    }

    #[test]
    fn test_footer_round_trips_thread_id() {
        let entry = LogEntry::new(LogKind::Opened, &thread(), Some(UserId::new(123)), None, Method::Button);
        assert_eq!(entry.footer(), "ID: 555");
        assert_eq!(parse_footer(&entry.footer()), Some(ChannelId::new(555)));
    }

    #[test]
    fn test_parse_footer_rejects_garbage() {
        assert_eq!(parse_footer("no id here"), None);
        assert_eq!(parse_footer("ID: abc"), None);
        assert_eq!(parse_footer("ID: 0"), None);
    }

    #[test]
    fn test_opened_description_has_no_actor_line() {
        let entry = LogEntry::new(LogKind::Opened, &thread(), Some(UserId::new(123)), None, Method::Button);
        let text = entry.description();
        assert!(text.contains("<#555>"));
        assert!(text.contains("<@123> (123)"));
        assert!(!text.contains("by:"));
    }

    #[test]
    fn test_description_without_author() {
        let entry = LogEntry::new(
            LogKind::Closed,
            &thread(),
            None,
            Some(UserId::new(789)),
            Method::Command,
        );
        let text = entry.description();
        assert!(text.contains("**Author:** unknown"));
        assert!(text.contains("**Closed by:** <@789> (789)"));
    }

    #[test]
    fn test_closed_description_names_actor_and_method() {
        let entry = LogEntry::new(
            LogKind::Closed,
            &thread(),
            Some(UserId::new(123)),
            Some(UserId::new(999)),
            Method::AuthorLeft,
        );
        let text = entry.description();
        assert!(text.contains("**Closed by:** <@999> (999)"));
        assert!(text.ends_with(Method::AuthorLeft.describe()));
    }

    #[test]
    fn test_intro_mentions_role_then_author() {
        let intro = IntroMessage {
            helper_role: RoleId::new(200),
            author: UserId::new(123),
            category: "Python".to_string(),
        };
        assert_eq!(intro.content(), "<@&200> | <@123>");
        assert_eq!(intro.title(), "Python Help needed!");
    }

    #[test]
    fn test_closed_dm_links_thread() {
        let dm = ClosedDm {
            thread_url: thread().jump_url(),
            thread_name: thread().name,
        };
        let text = dm.description();
        assert!(text.contains("(https://discord.com/channels/1/555)"));
        assert!(text.contains("**Python help (123)**"));
    }
}

//! The chat-platform collaborator interface.
//!
//! [`HelpPlatform`] is the only way the lifecycle manager reaches Discord.
//! Snapshots are fetched fresh for every interaction: archived and locked bits
//! live server-side and are never cached beyond one call.

use crate::{
    core::notice::{ClosedDm, ClosingNotice, IntroMessage, LogEntry},
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};

/// Whether a help thread is accepting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Unarchived and unlocked
    Open,
    /// Archived or locked
    Closed,
}

/// A thread as the platform currently reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSnapshot {
    /// Thread (channel) id
    pub id: ChannelId,
    /// Guild the thread belongs to
    pub guild_id: GuildId,
    /// Parent channel, `None` for anything that is not a thread
    pub parent_id: Option<ChannelId>,
    /// Current thread name
    pub name: String,
    /// Archived flag
    pub archived: bool,
    /// Locked flag
    pub locked: bool,
    /// Private threads are only readable by members and moderators
    pub private: bool,
}

impl ThreadSnapshot {
    /// Either flag set counts as closed.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        if self.archived || self.locked {
            LifecycleState::Closed
        } else {
            LifecycleState::Open
        }
    }

    /// Link that opens the thread in the Discord client.
    #[must_use]
    pub fn jump_url(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}",
            self.guild_id, self.id
        )
    }
}

/// The parts of a message the lifecycle manager looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    /// Message id
    pub id: MessageId,
    /// Users mentioned in the content, in order
    pub mentions: Vec<UserId>,
    /// Titles of attached embeds
    pub embed_titles: Vec<String>,
}

impl MessageSnapshot {
    /// Whether any embed on this message carries `title`.
    #[must_use]
    pub fn has_embed_titled(&self, title: &str) -> bool {
        self.embed_titles.iter().any(|t| t == title)
    }
}

/// Platform operations consumed by the help desk.
///
/// Implementations report a missing thread as `Ok(None)` from
/// [`HelpPlatform::thread`]; every other failure is an `Err`.
#[async_trait]
pub trait HelpPlatform: Send + Sync {
    /// Fetches the current state of a thread.
    async fn thread(&self, id: ChannelId) -> Result<Option<ThreadSnapshot>>;

    /// Oldest message in the thread.
    async fn first_message(&self, thread: ChannelId) -> Result<Option<MessageSnapshot>>;

    /// Up to `limit` most recent messages, newest first.
    async fn recent_messages(&self, thread: ChannelId, limit: u8) -> Result<Vec<MessageSnapshot>>;

    /// Creates a thread under `parent`.
    async fn create_thread(&self, parent: ChannelId, name: &str) -> Result<ThreadSnapshot>;

    /// Posts the introductory message (with the close button) in a new thread.
    async fn post_intro(&self, thread: ChannelId, intro: &IntroMessage) -> Result<MessageId>;

    /// Pins a message.
    async fn pin_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;

    /// Posts the "thread closed" notice.
    async fn post_closing_notice(
        &self,
        thread: ChannelId,
        notice: &ClosingNotice,
    ) -> Result<MessageId>;

    /// Locks and archives (`Closed`) or unlocks and unarchives (`Open`).
    async fn set_thread_state(&self, thread: ChannelId, state: LifecycleState) -> Result<()>;

    /// Renames a thread.
    async fn rename_thread(&self, thread: ChannelId, name: &str) -> Result<()>;

    /// Enables or disables the close button on the intro message.
    async fn set_close_button(
        &self,
        thread: ChannelId,
        intro: MessageId,
        enabled: bool,
    ) -> Result<()>;

    /// Deletes a message.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;

    /// Posts a log entry, with its controls, to the log channel.
    async fn send_log(&self, channel: ChannelId, entry: &LogEntry) -> Result<MessageId>;

    /// Sends the "your thread was closed" direct message.
    async fn send_closed_dm(&self, user: UserId, dm: &ClosedDm) -> Result<()>;

    /// Whether `user` has joined the thread.
    async fn is_thread_member(&self, thread: ChannelId, user: UserId) -> Result<bool>;

    /// Whether `user` holds Manage Threads in the thread's parent channel,
    /// which lets them read private threads without joining.
    async fn can_manage_threads(&self, thread: &ThreadSnapshot, user: UserId) -> Result<bool>;

    /// Adds `user` to the thread.
    async fn add_thread_member(&self, thread: ChannelId, user: UserId) -> Result<()>;

    /// Every active (unarchived) thread in the guild, any parent.
    async fn active_threads(&self, guild: GuildId) -> Result<Vec<ThreadSnapshot>>;
}

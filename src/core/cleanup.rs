//! Which platform system messages get deleted, and after how long.

use poise::serenity_prelude::ChannelId;
use std::time::Duration;

/// Delay before deleting "X started a thread" in the help channel.
pub const THREAD_CREATED_DELAY: Duration = Duration::from_secs(5);

/// Delay before deleting "X pinned a message" inside a help thread.
pub const PIN_ADDED_DELAY: Duration = Duration::from_secs(10);

/// System messages the help desk cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMessage {
    /// A thread was started from the channel
    ThreadCreated,
    /// A message was pinned
    PinAdded,
}

/// Returns the deletion delay for a system message posted in `channel`
/// (whose parent is `parent`), or `None` to leave it alone.
#[must_use]
pub fn cleanup_delay(
    kind: SystemMessage,
    channel: ChannelId,
    parent: Option<ChannelId>,
    help_channel: ChannelId,
) -> Option<Duration> {
    match kind {
        SystemMessage::ThreadCreated if channel == help_channel => Some(THREAD_CREATED_DELAY),
        SystemMessage::PinAdded if parent == Some(help_channel) => Some(PIN_ADDED_DELAY),
        _ => None,
    }
}

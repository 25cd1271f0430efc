//! Core help desk logic - framework-agnostic lifecycle, access and parsing.
//!
//! Nothing in here talks to Discord directly. Every platform side effect goes
//! through [`platform::HelpPlatform`], which the bot layer implements with
//! serenity and the tests implement in memory.

/// Who may close, re-open, retitle and list help threads
pub mod access;
/// Delayed deletion of noisy system messages
pub mod cleanup;
/// Timed yes/no gate in front of thread creation
pub mod confirm;
/// `help:` custom ids for persistent buttons
pub mod controls;
/// Splitting the help guide into message-sized sections
pub mod guide;
/// Open / close / re-open state machine
pub mod lifecycle;
/// Plain-data messages produced by the lifecycle (log entries, notices)
pub mod notice;
/// The chat-platform collaborator interface
pub mod platform;
/// Thread title parsing and formatting
pub mod topic;

use poise::serenity_prelude::{ChannelId, RoleId};

/// Fixed identifiers the lifecycle manager works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpSettings {
    /// Channel under which help threads are created
    pub help_channel: ChannelId,
    /// Channel receiving log entries
    pub log_channel: ChannelId,
    /// Helper role
    pub helper_role: RoleId,
    /// Staff / moderator role
    pub staff_role: RoleId,
}

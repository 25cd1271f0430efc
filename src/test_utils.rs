//! Shared test utilities for the help desk.
//!
//! [`FakePlatform`] is an in-memory [`HelpPlatform`] that records every
//! mutating call in order, so tests can assert on side effects and their
//! sequence without a Discord connection.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        HelpSettings,
        access::Actor,
        lifecycle::HelpDesk,
        notice::{ClosedDm, ClosingNotice, IntroMessage, LogEntry, LogKind},
        platform::{HelpPlatform, LifecycleState, MessageSnapshot, ThreadSnapshot},
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Guild every fake thread lives in.
pub const GUILD: GuildId = GuildId::new(1);
/// Configured help channel.
pub const HELP_CHANNEL: ChannelId = ChannelId::new(100);
/// Configured log channel.
pub const LOG_CHANNEL: ChannelId = ChannelId::new(101);
/// Some unrelated channel.
pub const OTHER_CHANNEL: ChannelId = ChannelId::new(300);
/// Helper role.
pub const HELPER_ROLE: RoleId = RoleId::new(200);
/// Staff role.
pub const STAFF_ROLE: RoleId = RoleId::new(201);
/// Default thread author.
pub const AUTHOR: UserId = UserId::new(123);
/// The bot's own user.
pub const BOT: UserId = UserId::new(999);

/// A mutating platform call, as recorded by [`FakePlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `create_thread`
    CreateThread { name: String },
    /// `post_intro`
    PostIntro { thread: ChannelId },
    /// `pin_message`
    Pin { thread: ChannelId },
    /// `post_closing_notice`
    ClosingNotice { thread: ChannelId },
    /// `set_thread_state`
    SetState {
        thread: ChannelId,
        state: LifecycleState,
    },
    /// `rename_thread`
    Rename { thread: ChannelId, name: String },
    /// `set_close_button`
    CloseButton { thread: ChannelId, enabled: bool },
    /// `delete_message`
    Delete {
        channel: ChannelId,
        message: MessageId,
    },
    /// `send_log`
    Log { kind: LogKind, thread: ChannelId },
    /// `send_closed_dm`
    Dm { user: UserId, delivered: bool },
    /// `add_thread_member`
    AddMember { thread: ChannelId, user: UserId },
}

/// In-memory platform double.
#[derive(Default)]
pub struct FakePlatform {
    threads: Mutex<HashMap<ChannelId, ThreadSnapshot>>,
    messages: Mutex<HashMap<ChannelId, Vec<MessageSnapshot>>>,
    members: Mutex<HashMap<ChannelId, HashSet<UserId>>>,
    moderators: Mutex<HashSet<UserId>>,
    calls: Mutex<Vec<Call>>,
    logs: Mutex<Vec<LogEntry>>,
    next_id: AtomicU64,
    history_reads: AtomicUsize,
    dms_fail: AtomicBool,
}

impl FakePlatform {
    fn next_id(&self) -> u64 {
        // Keep clear of the fixed ids above.
        10_000 + self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn push_message(&self, channel: ChannelId, message: MessageSnapshot) {
        self.messages
            .lock()
            .unwrap()
            .entry(channel)
            .or_default()
            .push(message);
    }

    fn insert_thread(&self, parent: ChannelId, name: String) -> ThreadSnapshot {
        let thread = ThreadSnapshot {
            id: ChannelId::new(self.next_id()),
            guild_id: GUILD,
            parent_id: Some(parent),
            name,
            archived: false,
            locked: false,
            private: true,
        };
        self.threads
            .lock()
            .unwrap()
            .insert(thread.id, thread.clone());
        thread
    }

    /// Adds an open thread under `parent` whose first message mentions `author`.
    pub fn add_thread(&self, parent: ChannelId, author: UserId) -> ChannelId {
        let thread = self.insert_thread(parent, format!("General help ({author})"));
        let intro = MessageSnapshot {
            id: MessageId::new(self.next_id()),
            mentions: vec![author],
            embed_titles: vec!["General Help needed!".to_string()],
        };
        self.push_message(thread.id, intro);
        self.members
            .lock()
            .unwrap()
            .entry(thread.id)
            .or_default()
            .insert(author);
        thread.id
    }

    /// Adds an open help thread owned by `author`.
    pub fn add_help_thread(&self, author: UserId) -> ChannelId {
        self.add_thread(HELP_CHANNEL, author)
    }

    /// Archives and locks a thread without recording a call.
    pub fn set_closed(&self, thread: ChannelId) {
        let mut threads = self.threads.lock().unwrap();
        let snapshot = threads.get_mut(&thread).unwrap();
        snapshot.archived = true;
        snapshot.locked = true;
    }

    /// Renames a thread without recording a call.
    pub fn rename(&self, thread: ChannelId, name: &str) {
        self.threads.lock().unwrap().get_mut(&thread).unwrap().name = name.to_string();
    }

    /// Deletes the first message of a thread without recording a call.
    pub fn remove_intro(&self, thread: ChannelId) {
        if let Some(list) = self.messages.lock().unwrap().get_mut(&thread) {
            list.remove(0);
        }
    }

    /// Turns a private thread into a public one.
    pub fn make_public(&self, thread: ChannelId) {
        self.threads.lock().unwrap().get_mut(&thread).unwrap().private = false;
    }

    /// Gives `user` Manage Threads in every channel.
    pub fn grant_manage_threads(&self, user: UserId) {
        self.moderators.lock().unwrap().insert(user);
    }

    /// Makes every DM fail, as when the user blocks DMs.
    pub fn fail_dms(&self) {
        self.dms_fail.store(true, Ordering::Relaxed);
    }

    /// Current state of a thread.
    pub fn snapshot(&self, thread: ChannelId) -> Option<ThreadSnapshot> {
        self.threads.lock().unwrap().get(&thread).cloned()
    }

    /// Messages in a thread, oldest first.
    pub fn messages(&self, thread: ChannelId) -> Vec<MessageSnapshot> {
        self.messages
            .lock()
            .unwrap()
            .get(&thread)
            .cloned()
            .unwrap_or_default()
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Log entries sent, in order.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap().clone()
    }

    /// How many times the first message was fetched.
    pub fn history_reads(&self) -> usize {
        self.history_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HelpPlatform for FakePlatform {
    async fn thread(&self, id: ChannelId) -> Result<Option<ThreadSnapshot>> {
        Ok(self.snapshot(id))
    }

    async fn first_message(&self, thread: ChannelId) -> Result<Option<MessageSnapshot>> {
        self.history_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.messages(thread).into_iter().next())
    }

    async fn recent_messages(&self, thread: ChannelId, limit: u8) -> Result<Vec<MessageSnapshot>> {
        Ok(self
            .messages(thread)
            .into_iter()
            .rev()
            .take(usize::from(limit))
            .collect())
    }

    async fn create_thread(&self, parent: ChannelId, name: &str) -> Result<ThreadSnapshot> {
        self.record(Call::CreateThread {
            name: name.to_string(),
        });
        Ok(self.insert_thread(parent, name.to_string()))
    }

    async fn post_intro(&self, thread: ChannelId, intro: &IntroMessage) -> Result<MessageId> {
        self.record(Call::PostIntro { thread });
        let id = MessageId::new(self.next_id());
        self.push_message(
            thread,
            MessageSnapshot {
                id,
                    mentions: vec![intro.author],
                embed_titles: vec![intro.title()],
            },
        );
        self.members
            .lock()
            .unwrap()
            .entry(thread)
            .or_default()
            .insert(intro.author);
        Ok(id)
    }

    async fn pin_message(&self, channel: ChannelId, _message: MessageId) -> Result<()> {
        self.record(Call::Pin { thread: channel });
        Ok(())
    }

    async fn post_closing_notice(
        &self,
        thread: ChannelId,
        notice: &ClosingNotice,
    ) -> Result<MessageId> {
        self.record(Call::ClosingNotice { thread });
        let id = MessageId::new(self.next_id());
        self.push_message(
            thread,
            MessageSnapshot {
                id,
                    mentions: Vec::new(),
                embed_titles: vec![notice.title.to_string()],
            },
        );
        Ok(id)
    }

    async fn set_thread_state(&self, thread: ChannelId, state: LifecycleState) -> Result<()> {
        self.record(Call::SetState { thread, state });
        let closed = state == LifecycleState::Closed;
        let mut threads = self.threads.lock().unwrap();
        let snapshot = threads
            .get_mut(&thread)
            .ok_or_else(|| Error::not_found(format!("thread {thread}")))?;
        snapshot.archived = closed;
        snapshot.locked = closed;
        Ok(())
    }

    async fn rename_thread(&self, thread: ChannelId, name: &str) -> Result<()> {
        self.record(Call::Rename {
            thread,
            name: name.to_string(),
        });
        self.rename(thread, name);
        Ok(())
    }

    async fn set_close_button(
        &self,
        thread: ChannelId,
        _intro: MessageId,
        enabled: bool,
    ) -> Result<()> {
        self.record(Call::CloseButton { thread, enabled });
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.record(Call::Delete { channel, message });
        let mut messages = self.messages.lock().unwrap();
        let list = messages.entry(channel).or_default();
        let before = list.len();
        list.retain(|m| m.id != message);
        if list.len() == before {
            return Err(Error::not_found(format!("message {message}")));
        }
        Ok(())
    }

    async fn send_log(&self, _channel: ChannelId, entry: &LogEntry) -> Result<MessageId> {
        self.record(Call::Log {
            kind: entry.kind,
            thread: entry.thread.id,
        });
        self.logs.lock().unwrap().push(entry.clone());
        Ok(MessageId::new(self.next_id()))
    }

    async fn send_closed_dm(&self, user: UserId, _dm: &ClosedDm) -> Result<()> {
        let delivered = !self.dms_fail.load(Ordering::Relaxed);
        self.record(Call::Dm { user, delivered });
        if delivered {
            Ok(())
        } else {
            Err(Error::not_found(format!("a DM channel for {user}")))
        }
    }

    async fn is_thread_member(&self, thread: ChannelId, user: UserId) -> Result<bool> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&thread)
            .is_some_and(|m| m.contains(&user)))
    }

    async fn can_manage_threads(&self, _thread: &ThreadSnapshot, user: UserId) -> Result<bool> {
        Ok(self.moderators.lock().unwrap().contains(&user))
    }

    async fn add_thread_member(&self, thread: ChannelId, user: UserId) -> Result<()> {
        self.record(Call::AddMember { thread, user });
        self.members
            .lock()
            .unwrap()
            .entry(thread)
            .or_default()
            .insert(user);
        Ok(())
    }

    async fn active_threads(&self, guild: GuildId) -> Result<Vec<ThreadSnapshot>> {
        Ok(self
            .threads
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.guild_id == guild && !t.archived)
            .cloned()
            .collect())
    }
}

/// Settings matching the fixed ids above.
pub const fn test_settings() -> HelpSettings {
    HelpSettings {
        help_channel: HELP_CHANNEL,
        log_channel: LOG_CHANNEL,
        helper_role: HELPER_ROLE,
        staff_role: STAFF_ROLE,
    }
}

/// A help desk over an empty [`FakePlatform`].
/// This is the standard setup for lifecycle tests.
pub fn setup_desk() -> HelpDesk<FakePlatform> {
    HelpDesk::new(FakePlatform::default(), test_settings())
}

/// A member with no roles.
pub fn member(id: u64) -> Actor {
    Actor::new(UserId::new(id), Vec::new())
}

/// A member holding the helper role.
pub fn helper() -> Actor {
    Actor::new(UserId::new(456), vec![HELPER_ROLE])
}

/// A member holding the staff role.
pub fn staff() -> Actor {
    Actor::new(UserId::new(789), vec![STAFF_ROLE])
}

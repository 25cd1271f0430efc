//! Help thread lifecycle - open, close and re-open, plus retitle, view and
//! listing.
//!
//! State lives on the platform (archived/locked flags) and is re-read on every
//! call. Side effects of a transition run in a fixed order: the in-thread
//! message, then the lock state, then the log entry, then the best-effort DM.

use crate::{
    core::{
        HelpSettings,
        access::{AccessPolicy, Action, Actor, is_help_thread},
        notice::{
            CLOSING_NOTICE_TITLE, ClosedDm, ClosingNotice, IntroMessage, LogEntry, LogKind, Method,
        },
        platform::{HelpPlatform, LifecycleState, MessageSnapshot, ThreadSnapshot},
        topic,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// How many recent messages re-opening searches for the closing notice.
pub const NOTICE_SCAN_LIMIT: u8 = 10;

/// What a lifecycle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The thread moved to a new state
    Applied,
    /// The thread was already in the requested state; nothing happened
    Unchanged,
    /// The channel is not a help thread; nothing happened
    NotHelpThread,
}

/// Result of asking to view a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The user could already read the thread
    AlreadyMember,
    /// The user was added to the thread
    Added,
}

/// One row of the `openthreads` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenThread {
    /// Thread id
    pub id: ChannelId,
    /// Topic recovered from the thread name
    pub topic: String,
    /// Id embedded in the thread name, if any
    pub embedded_id: Option<u64>,
}

/// Finds a thread's author from its first message, at most once per
/// interaction.
pub struct AuthorLookup<'a, P: ?Sized> {
    platform: &'a P,
    thread: ChannelId,
    first: OnceCell<Option<MessageSnapshot>>,
}

impl<'a, P: HelpPlatform + ?Sized> AuthorLookup<'a, P> {
    /// Creates an empty lookup for `thread`.
    #[must_use]
    pub fn new(platform: &'a P, thread: ChannelId) -> Self {
        Self {
            platform,
            thread,
            first: OnceCell::new(),
        }
    }

    /// A missing first message is remembered too, so messages posted later
    /// in the same interaction are never mistaken for the intro.
    async fn first_message(&self) -> Result<&MessageSnapshot> {
        self.first
            .get_or_try_init(|| self.platform.first_message(self.thread))
            .await?
            .as_ref()
            .ok_or_else(|| Error::not_found(format!("the first message of thread {}", self.thread)))
    }

    /// The author, fetched on first use. The first message must mention the
    /// author; the helper role ping is a role mention and does not count.
    pub async fn get(&self) -> Result<UserId> {
        let first = self.first_message().await?;
        first
            .mentions
            .first()
            .copied()
            .ok_or_else(|| Error::not_found(format!("the author of thread {}", self.thread)))
    }

    /// Like [`Self::get`], but a deleted intro or one without an author
    /// mention gives `None` instead of an error.
    pub async fn find(&self) -> Result<Option<UserId>> {
        match self.get().await {
            Ok(author) => Ok(Some(author)),
            Err(Error::NotFound { what }) => {
                debug!(thread = %self.thread, "No author: {} not found", what);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Id of the intro message, which carries the close button.
    pub async fn intro_id(&self) -> Result<MessageId> {
        Ok(self.first_message().await?.id)
    }
}

/// The help thread state machine.
pub struct HelpDesk<P> {
    platform: P,
    settings: HelpSettings,
    policy: AccessPolicy,
}

impl<P: HelpPlatform> HelpDesk<P> {
    /// Creates a help desk over `platform`.
    pub fn new(platform: P, settings: HelpSettings) -> Self {
        Self {
            policy: AccessPolicy::from(&settings),
            platform,
            settings,
        }
    }

    /// The platform adapter.
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// The configured identifiers.
    pub const fn settings(&self) -> &HelpSettings {
        &self.settings
    }

    /// Resolves a thread, failing with [`Error::NotFound`] if it is gone.
    pub async fn resolve(&self, thread: ChannelId) -> Result<ThreadSnapshot> {
        self.platform
            .thread(thread)
            .await?
            .ok_or_else(|| Error::not_found(format!("thread {thread}")))
    }

    /// Creates a help thread for `requester` after they confirmed.
    #[instrument(skip(self))]
    pub async fn open_thread(&self, requester: UserId, category: &str) -> Result<ThreadSnapshot> {
        let name = topic::new_thread_title(category, requester.get());
        let thread = self
            .platform
            .create_thread(self.settings.help_channel, &name)
            .await?;

        let intro = IntroMessage {
            helper_role: self.settings.helper_role,
            author: requester,
            category: category.to_string(),
        };
        let intro_id = self.platform.post_intro(thread.id, &intro).await?;
        self.platform.pin_message(thread.id, intro_id).await?;

        let entry = LogEntry::new(LogKind::Opened, &thread, Some(requester), None, Method::Button);
        self.platform.send_log(self.settings.log_channel, &entry).await?;

        info!(thread = %thread.id, name = %thread.name, "Opened help thread");
        Ok(thread)
    }

    /// Closes a help thread on behalf of `actor`.
    pub async fn close_thread(
        &self,
        thread: ChannelId,
        actor: &Actor,
        method: Method,
    ) -> Result<Transition> {
        let author = AuthorLookup::new(&self.platform, thread);
        self.close_with(thread, &author, actor, method).await
    }

    /// Like [`Self::close_thread`], reusing an author lookup the caller already
    /// holds for this interaction.
    #[instrument(skip(self, author_lookup, actor), fields(actor = %actor.id))]
    pub async fn close_with(
        &self,
        thread: ChannelId,
        author_lookup: &AuthorLookup<'_, P>,
        actor: &Actor,
        method: Method,
    ) -> Result<Transition> {
        let thread = self.resolve(thread).await?;
        if !is_help_thread(&thread, self.settings.help_channel) {
            return Ok(Transition::NotHelpThread);
        }
        if thread.state() == LifecycleState::Closed {
            debug!(thread = %thread.id, "Thread already closed");
            return Ok(Transition::Unchanged);
        }

        let author = author_lookup.find().await?;
        AccessPolicy::require(self.policy.may_close(actor, author, method), Action::Close)?;

        self.platform
            .post_closing_notice(thread.id, &ClosingNotice::default())
            .await?;
        self.toggle_close_button(author_lookup, false).await;
        self.platform
            .set_thread_state(thread.id, LifecycleState::Closed)
            .await?;

        let entry = LogEntry::new(LogKind::Closed, &thread, author, Some(actor.id), method);
        self.platform.send_log(self.settings.log_channel, &entry).await?;

        if let Some(author) = author {
            let dm = ClosedDm {
                thread_url: thread.jump_url(),
                thread_name: thread.name.clone(),
            };
            if let Err(e) = self.platform.send_closed_dm(author, &dm).await {
                debug!(user = %author, "Could not DM thread author: {}", e);
            }
        }

        info!(thread = %thread.id, ?method, "Closed help thread");
        Ok(Transition::Applied)
    }

    /// Closes the thread automatically if `member` was its author.
    #[instrument(skip(self))]
    pub async fn handle_member_left(
        &self,
        thread: ChannelId,
        member: UserId,
        bot: UserId,
    ) -> Result<Transition> {
        let snapshot = self.resolve(thread).await?;
        if !is_help_thread(&snapshot, self.settings.help_channel) {
            return Ok(Transition::NotHelpThread);
        }
        if snapshot.state() == LifecycleState::Closed {
            return Ok(Transition::Unchanged);
        }

        let author = AuthorLookup::new(&self.platform, thread);
        if author.find().await? != Some(member) {
            return Ok(Transition::Unchanged);
        }
        self.close_with(thread, &author, &Actor::bot(bot), Method::AuthorLeft)
            .await
    }

    /// Re-opens a closed help thread. Staff only.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn reopen_thread(&self, thread: ChannelId, actor: &Actor) -> Result<Transition> {
        let thread = self.resolve(thread).await?;
        if !is_help_thread(&thread, self.settings.help_channel) {
            return Ok(Transition::NotHelpThread);
        }
        AccessPolicy::require(self.policy.may(actor, Action::Reopen), Action::Reopen)?;
        if thread.state() == LifecycleState::Open {
            return Ok(Transition::Unchanged);
        }

        let author_lookup = AuthorLookup::new(&self.platform, thread.id);
        let author = author_lookup.find().await?;
        self.platform
            .set_thread_state(thread.id, LifecycleState::Open)
            .await?;
        if let Some(notice) = self.find_closing_notice(thread.id).await {
            if let Err(e) = self.platform.delete_message(thread.id, notice).await {
                debug!(message = %notice, "Could not delete closing notice: {}", e);
            }
        }
        self.toggle_close_button(&author_lookup, true).await;

        let entry = LogEntry::new(
            LogKind::Reopened,
            &thread,
            author,
            Some(actor.id),
            Method::LogButton,
        );
        self.platform.send_log(self.settings.log_channel, &entry).await?;

        info!(thread = %thread.id, "Re-opened help thread");
        Ok(Transition::Applied)
    }

    /// Enables or disables the intro's close button. The intro may have been
    /// deleted, so failures are only logged.
    async fn toggle_close_button(&self, author_lookup: &AuthorLookup<'_, P>, enabled: bool) {
        let result = match author_lookup.intro_id().await {
            Ok(intro) => {
                self.platform
                    .set_close_button(author_lookup.thread, intro, enabled)
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            debug!(thread = %author_lookup.thread, enabled, "Could not update close button: {}", e);
        }
    }

    /// Most recent closing notice among the last few messages, if any.
    async fn find_closing_notice(&self, thread: ChannelId) -> Option<MessageId> {
        match self.platform.recent_messages(thread, NOTICE_SCAN_LIMIT).await {
            Ok(messages) => messages
                .into_iter()
                .find(|m| m.has_embed_titled(CLOSING_NOTICE_TITLE))
                .map(|m| m.id),
            Err(e) => {
                debug!(%thread, "Could not read recent messages: {}", e);
                None
            }
        }
    }

    /// Renames a help thread to `"<topic> (<id>)"`. Returns the new name, or
    /// `None` when the channel is not a help thread.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn retitle(
        &self,
        thread: ChannelId,
        actor: &Actor,
        new_topic: &str,
    ) -> Result<Option<String>> {
        let thread = self.resolve(thread).await?;
        if !is_help_thread(&thread, self.settings.help_channel) {
            return Ok(None);
        }
        AccessPolicy::require(self.policy.may(actor, Action::Retitle), Action::Retitle)?;
        if new_topic.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "The topic cannot be empty.".to_string(),
            });
        }

        let id = match topic::parse_title(&thread.name).id {
            Some(id) => Some(id),
            None => match AuthorLookup::new(&self.platform, thread.id).get().await {
                Ok(author) => Some(author.get()),
                Err(e) => {
                    warn!(thread = %thread.id, "Renaming without an id: {}", e);
                    None
                }
            },
        };
        let name = topic::format_title(new_topic, id);
        self.platform.rename_thread(thread.id, &name).await?;
        info!(thread = %thread.id, %name, "Retitled help thread");
        Ok(Some(name))
    }

    /// Gives `user` access to a thread. Anyone may ask. Public threads,
    /// members and thread moderators already have access.
    pub async fn view_thread(&self, thread: ChannelId, user: UserId) -> Result<ViewOutcome> {
        let thread = self.resolve(thread).await?;
        if !thread.private
            || self.platform.is_thread_member(thread.id, user).await?
            || self.platform.can_manage_threads(&thread, user).await?
        {
            return Ok(ViewOutcome::AlreadyMember);
        }
        self.platform.add_thread_member(thread.id, user).await?;
        Ok(ViewOutcome::Added)
    }

    /// Active, unarchived help threads in `guild`, oldest first.
    pub async fn open_threads(&self, guild: GuildId) -> Result<Vec<OpenThread>> {
        let mut threads: Vec<OpenThread> = self
            .platform
            .active_threads(guild)
            .await?
            .into_iter()
            .filter(|t| is_help_thread(t, self.settings.help_channel) && !t.archived)
            .map(|t| {
                let parsed = topic::parse_title(&t.name);
                OpenThread {
                    id: t.id,
                    topic: parsed.topic.to_string(),
                    embedded_id: parsed.id,
                }
            })
            .collect();
        threads.sort_by_key(|t| t.id);
        Ok(threads)
    }
}

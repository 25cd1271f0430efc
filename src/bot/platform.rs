//! [`HelpPlatform`] backed by the live Discord connection.
//!
//! Every method is a thin REST call; the lifecycle rules live in
//! [`crate::core::lifecycle`]. A 404 from Discord on a lookup becomes `None`
//! so the core can report it as a missing thread instead of a crash.

use crate::{
    bot::render,
    core::{
        notice::{ClosedDm, ClosingNotice, IntroMessage, LogEntry},
        platform::{HelpPlatform, LifecycleState, MessageSnapshot, ThreadSnapshot},
    },
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{ChannelId, GuildId, MessageId, UserId};
use tracing::debug;

/// Message ids start above this, so `after` it means "from the beginning".
const OLDEST_MESSAGE: MessageId = MessageId::new(1);

/// Discord-backed platform. Cheap to construct per interaction.
#[derive(Clone)]
pub struct SerenityPlatform {
    ctx: serenity::Context,
}

impl SerenityPlatform {
    /// Wraps the serenity context handed to a command or event.
    #[must_use]
    pub fn new(ctx: &serenity::Context) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Private threads need boost tier 2; fall back to public threads when
    /// the guild is below that or not cached.
    async fn thread_kind(&self, parent: ChannelId) -> serenity::ChannelType {
        let guild_id = match parent.to_channel(&self.ctx).await {
            Ok(channel) => channel.guild().map(|c| c.guild_id),
            Err(e) => {
                debug!(%parent, "Could not resolve help channel guild: {}", e);
                None
            }
        };
        let boosted = guild_id
            .and_then(|id| self.ctx.cache.guild(id).map(|g| g.premium_tier))
            .is_some_and(|tier| {
                matches!(
                    tier,
                    serenity::PremiumTier::Tier2 | serenity::PremiumTier::Tier3
                )
            });
        if boosted {
            serenity::ChannelType::PrivateThread
        } else {
            serenity::ChannelType::PublicThread
        }
    }
}

/// Whether a serenity error is Discord answering 404.
pub fn is_not_found(error: &serenity::Error) -> bool {
    matches!(
        error,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

/// Converts a guild channel; `parent_id` is only kept for threads.
#[must_use]
pub fn thread_snapshot(channel: &serenity::GuildChannel) -> ThreadSnapshot {
    let is_thread = matches!(
        channel.kind,
        serenity::ChannelType::PublicThread
            | serenity::ChannelType::PrivateThread
            | serenity::ChannelType::NewsThread
    );
    let (archived, locked) = channel
        .thread_metadata
        .as_ref()
        .map_or((false, false), |m| (m.archived, m.locked));
    ThreadSnapshot {
        id: channel.id,
        guild_id: channel.guild_id,
        parent_id: if is_thread { channel.parent_id } else { None },
        name: channel.name.clone(),
        archived,
        locked,
        private: channel.kind == serenity::ChannelType::PrivateThread,
    }
}

fn message_snapshot(message: &serenity::Message) -> MessageSnapshot {
    MessageSnapshot {
        id: message.id,
        mentions: message.mentions.iter().map(|u| u.id).collect(),
        embed_titles: message
            .embeds
            .iter()
            .filter_map(|e| e.title.clone())
            .collect(),
    }
}

#[async_trait]
impl HelpPlatform for SerenityPlatform {
    async fn thread(&self, id: ChannelId) -> Result<Option<ThreadSnapshot>> {
        match id.to_channel(&self.ctx).await {
            Ok(channel) => Ok(channel.guild().as_ref().map(thread_snapshot)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn first_message(&self, thread: ChannelId) -> Result<Option<MessageSnapshot>> {
        let messages = thread
            .messages(
                &self.ctx,
                serenity::GetMessages::new().after(OLDEST_MESSAGE).limit(1),
            )
            .await?;
        Ok(messages.first().map(message_snapshot))
    }

    async fn recent_messages(&self, thread: ChannelId, limit: u8) -> Result<Vec<MessageSnapshot>> {
        let messages = thread
            .messages(&self.ctx, serenity::GetMessages::new().limit(limit))
            .await?;
        Ok(messages.iter().map(message_snapshot).collect())
    }

    async fn create_thread(&self, parent: ChannelId, name: &str) -> Result<ThreadSnapshot> {
        let kind = self.thread_kind(parent).await;
        let thread = parent
            .create_thread(&self.ctx, serenity::CreateThread::new(name).kind(kind))
            .await?;
        Ok(thread_snapshot(&thread))
    }

    async fn post_intro(&self, thread: ChannelId, intro: &IntroMessage) -> Result<MessageId> {
        let message = thread
            .send_message(&self.ctx, render::intro_message(intro))
            .await?;
        Ok(message.id)
    }

    async fn pin_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        channel.pin(&self.ctx, message).await?;
        Ok(())
    }

    async fn post_closing_notice(
        &self,
        thread: ChannelId,
        notice: &ClosingNotice,
    ) -> Result<MessageId> {
        let message = thread
            .send_message(
                &self.ctx,
                serenity::CreateMessage::new().embed(render::closing_notice_embed(notice)),
            )
            .await?;
        Ok(message.id)
    }

    async fn set_thread_state(&self, thread: ChannelId, state: LifecycleState) -> Result<()> {
        let closed = state == LifecycleState::Closed;
        thread
            .edit_thread(
                &self.ctx,
                serenity::EditThread::new().archived(closed).locked(closed),
            )
            .await?;
        Ok(())
    }

    async fn rename_thread(&self, thread: ChannelId, name: &str) -> Result<()> {
        thread
            .edit_thread(&self.ctx, serenity::EditThread::new().name(name))
            .await?;
        Ok(())
    }

    async fn set_close_button(
        &self,
        thread: ChannelId,
        intro: MessageId,
        enabled: bool,
    ) -> Result<()> {
        let message = thread.message(&self.ctx, intro).await?;
        let rows = render::set_close_enabled(&message.components, enabled);
        thread
            .edit_message(&self.ctx, intro, serenity::EditMessage::new().components(rows))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        channel.delete_message(&self.ctx, message).await?;
        Ok(())
    }

    async fn send_log(&self, channel: ChannelId, entry: &LogEntry) -> Result<MessageId> {
        let message = channel
            .send_message(&self.ctx, render::log_message(entry))
            .await?;
        Ok(message.id)
    }

    async fn send_closed_dm(&self, user: UserId, dm: &ClosedDm) -> Result<()> {
        user.direct_message(
            &self.ctx,
            serenity::CreateMessage::new().embed(render::closed_dm_embed(dm)),
        )
        .await?;
        Ok(())
    }

    async fn is_thread_member(&self, thread: ChannelId, user: UserId) -> Result<bool> {
        let members = thread.get_thread_members(&self.ctx).await?;
        Ok(members.iter().any(|m| m.user_id == user))
    }

    async fn can_manage_threads(&self, thread: &ThreadSnapshot, user: UserId) -> Result<bool> {
        let Some(parent) = thread.parent_id else {
            return Ok(false);
        };
        let member = thread.guild_id.member(&self.ctx, user).await?;
        let Some(guild) = self.ctx.cache.guild(thread.guild_id) else {
            debug!(guild = %thread.guild_id, "Guild not cached; assuming no thread permissions");
            return Ok(false);
        };
        Ok(guild.channels.get(&parent).is_some_and(|channel| {
            guild.user_permissions_in(channel, &member).manage_threads()
        }))
    }

    async fn add_thread_member(&self, thread: ChannelId, user: UserId) -> Result<()> {
        thread.add_thread_member(&self.ctx, user).await?;
        Ok(())
    }

    async fn active_threads(&self, guild: GuildId) -> Result<Vec<ThreadSnapshot>> {
        let data = guild.get_active_threads(&self.ctx).await?;
        Ok(data.threads.iter().map(thread_snapshot).collect())
    }
}


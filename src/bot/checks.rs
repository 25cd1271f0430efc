//! Poise command checks. A failed check is silent; see `on_error`.

use crate::{
    bot::{Context, platform},
    core::access::{Actor, is_help_thread},
    errors::Result,
};
use poise::serenity_prelude as serenity;

/// Builds an [`Actor`] from a guild member.
#[must_use]
pub fn actor_from_member(member: &serenity::Member) -> Actor {
    Actor::new(member.user.id, member.roles.clone())
}

/// The invoking member as an [`Actor`], if the command ran in a guild.
pub async fn invoking_actor(ctx: Context<'_>) -> Option<Actor> {
    ctx.author_member()
        .await
        .map(|member| actor_from_member(&member))
}

/// Passes when invoked inside a help thread.
pub async fn is_thread(ctx: Context<'_>) -> Result<bool> {
    let channel = ctx
        .channel_id()
        .to_channel(ctx.serenity_context())
        .await?;
    let Some(channel) = channel.guild() else {
        return Ok(false);
    };
    let snapshot = platform::thread_snapshot(&channel);
    Ok(is_help_thread(&snapshot, ctx.data().settings.help_channel))
}

/// Passes for helpers and staff.
pub async fn can_close(ctx: Context<'_>) -> Result<bool> {
    let Some(actor) = invoking_actor(ctx).await else {
        return Ok(false);
    };
    Ok(ctx.data().policy().is_helper_or_staff(&actor))
}

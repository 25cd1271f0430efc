//! Gateway events outside of commands and buttons.

use crate::{
    bot::BotData,
    core::{
        cleanup::{SystemMessage, cleanup_delay},
        lifecycle::Transition,
    },
    errors::Result,
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

fn system_message(kind: serenity::MessageType) -> Option<SystemMessage> {
    match kind {
        serenity::MessageType::ThreadCreated => Some(SystemMessage::ThreadCreated),
        serenity::MessageType::PinsAdd => Some(SystemMessage::PinAdded),
        _ => None,
    }
}

/// Deletes "started a thread" and "pinned a message" notices that belong to
/// the help desk after a short delay.
pub async fn on_message(
    ctx: &serenity::Context,
    data: &BotData,
    message: &serenity::Message,
) -> Result<()> {
    let Some(kind) = system_message(message.kind) else {
        return Ok(());
    };
    let parent = match kind {
        SystemMessage::ThreadCreated => None,
        SystemMessage::PinAdded => message
            .channel_id
            .to_channel(ctx)
            .await?
            .guild()
            .and_then(|channel| channel.parent_id),
    };
    let Some(delay) = cleanup_delay(
        kind,
        message.channel_id,
        parent,
        data.settings.help_channel,
    ) else {
        return Ok(());
    };
    schedule_delete(Arc::clone(&ctx.http), message.channel_id, message.id, delay);
    Ok(())
}

fn schedule_delete(
    http: Arc<serenity::Http>,
    channel: serenity::ChannelId,
    message: serenity::MessageId,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = channel.delete_message(&http, message).await {
            debug!(%channel, %message, "System message already gone: {}", e);
        }
    });
}

/// Closes a help thread when its author leaves it.
pub async fn on_thread_members_update(
    ctx: &serenity::Context,
    data: &BotData,
    update: &serenity::ThreadMembersUpdateEvent,
) -> Result<()> {
    if update.removed_member_ids.is_empty() {
        return Ok(());
    }
    let bot = ctx.cache.current_user().id;
    let desk = data.help_desk(ctx);
    for &member in &update.removed_member_ids {
        if member == bot {
            continue;
        }
        match desk.handle_member_left(update.id, member, bot).await {
            Ok(Transition::Applied) => {
                info!(thread = %update.id, %member, "Closed help thread after its author left");
                break;
            }
            Ok(_) => {}
            Err(e) if e.is_user_facing() => {
                debug!(thread = %update.id, %member, "Skipping member removal: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_thread_and_pin_notices_are_cleaned() {
        assert_eq!(
            system_message(serenity::MessageType::ThreadCreated),
            Some(SystemMessage::ThreadCreated)
        );
        assert_eq!(
            system_message(serenity::MessageType::PinsAdd),
            Some(SystemMessage::PinAdded)
        );
        assert_eq!(system_message(serenity::MessageType::Regular), None);
        assert_eq!(system_message(serenity::MessageType::InlineReply), None);
    }
}

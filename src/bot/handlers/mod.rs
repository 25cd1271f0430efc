//! Discord gateway event handling
//!
//! Routes system messages to the cleanup task, member removals to the
//! author-left close and button presses to [`ControlRegistry`].

/// Persistent button handlers
pub mod components;
/// System message cleanup and member removal
pub mod events;

pub use components::ControlRegistry;

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;

/// Entry point for every gateway event poise forwards.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::on_message(ctx, data, new_message).await
        }
        serenity::FullEvent::ThreadMembersUpdate {
            thread_members_update,
        } => events::on_thread_members_update(ctx, data, thread_members_update).await,
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => data.controls.dispatch(ctx, data, component).await,
        _ => Ok(()),
    }
}

//! Persistent button handlers.
//!
//! Buttons outlive the process that posted them, so they are dispatched on
//! their fixed custom id instead of per-message state. [`ControlRegistry`] is
//! built once at startup with a handler for every [`ControlKind`].
//!
//! Every handler acknowledges its interaction before doing anything slow, so
//! user-facing errors can always be reported as an ephemeral followup.

use crate::{
    bot::{BotData, checks::actor_from_member, platform::SerenityPlatform, render},
    core::{
        access::Actor,
        confirm::{CONFIRM_PROMPT, CONFIRM_WINDOW, await_confirmation},
        controls::{Control, ControlKind},
        lifecycle::{HelpDesk, Transition, ViewOutcome},
        notice::{Method, parse_footer},
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use serenity::ComponentInteraction;
use std::{collections::HashMap, future::Future, pin::Pin};
use tracing::{debug, info, instrument, warn};

/// Reply when a log entry points at a thread that no longer exists.
pub const MISSING_THREAD: &str = "I can not find the thread associated with this log.";

type ControlFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

type ControlHandler = for<'a> fn(
    &'a serenity::Context,
    &'a BotData,
    &'a ComponentInteraction,
    &'a Control,
) -> ControlFuture<'a>;

/// Maps every help desk button to its handler.
pub struct ControlRegistry {
    handlers: HashMap<ControlKind, ControlHandler>,
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlRegistry {
    /// Registers a handler for every [`ControlKind`].
    #[must_use]
    pub fn new() -> Self {
        let handlers = ControlKind::ALL
            .into_iter()
            .map(|kind| (kind, handler_for(kind)))
            .collect();
        Self { handlers }
    }

    /// Whether presses of `kind` are handled.
    #[must_use]
    pub fn handles(&self, kind: ControlKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Runs the handler for a pressed button. Buttons that are not ours are
    /// ignored.
    #[instrument(skip_all, fields(custom_id = %interaction.data.custom_id, user = %interaction.user.id))]
    pub async fn dispatch(
        &self,
        ctx: &serenity::Context,
        data: &BotData,
        interaction: &ComponentInteraction,
    ) -> Result<()> {
        let Some(control) = Control::parse(&interaction.data.custom_id) else {
            return Ok(());
        };
        let Some(handler) = self.handlers.get(&control.kind()) else {
            warn!("No handler registered for {:?}", control.kind());
            return Ok(());
        };
        match handler(ctx, data, interaction, &control).await {
            Err(e) if e.is_user_facing() => {
                debug!("Button refused: {}", e);
                followup(ctx, interaction, e.to_string()).await
            }
            other => other,
        }
    }
}

fn handler_for(kind: ControlKind) -> ControlHandler {
    match kind {
        ControlKind::Create => |ctx, data, interaction, control| {
            Box::pin(create_thread(ctx, data, interaction, control))
        },
        ControlKind::Confirm | ControlKind::Decline => |ctx, _, interaction, control| {
            Box::pin(settle_answer(ctx, interaction, control))
        },
        ControlKind::ThreadClose => |ctx, data, interaction, _| {
            Box::pin(thread_close(ctx, data, interaction))
        },
        ControlKind::LogView => |ctx, data, interaction, _| {
            Box::pin(log_view(ctx, data, interaction))
        },
        ControlKind::LogClose => |ctx, data, interaction, _| {
            Box::pin(log_close(ctx, data, interaction))
        },
        ControlKind::LogReopen => |ctx, data, interaction, _| {
            Box::pin(log_reopen(ctx, data, interaction))
        },
    }
}

async fn followup(
    ctx: &serenity::Context,
    interaction: &ComponentInteraction,
    text: impl Into<String>,
) -> Result<()> {
    interaction
        .create_followup(
            ctx,
            serenity::CreateInteractionResponseFollowup::new()
                .content(text)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}

fn actor_of(interaction: &ComponentInteraction) -> Option<Actor> {
    interaction.member.as_ref().map(actor_from_member)
}

/// Category button: asks for confirmation, then opens the thread.
async fn create_thread(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &ComponentInteraction,
    control: &Control,
) -> Result<()> {
    let Control::Create(key) = control else {
        return Ok(());
    };
    let Some(category) = data.config.help.category(key) else {
        interaction
            .create_response(
                ctx,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("That help category no longer exists.")
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    };

    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(CONFIRM_PROMPT)
                    .components(render::confirm_buttons(false))
                    .ephemeral(true),
            ),
        )
        .await?;
    let prompt = interaction.get_response(ctx).await?;

    let requester = interaction.user.id;
    let answer = async {
        let press = serenity::ComponentInteractionCollector::new(ctx)
            .message_id(prompt.id)
            .author_id(requester)
            .next()
            .await?;
        Some(Control::parse(&press.data.custom_id) == Some(Control::Confirm))
    };
    let outcome = await_confirmation(answer, CONFIRM_WINDOW).await;

    interaction
        .edit_response(
            ctx,
            serenity::EditInteractionResponse::new()
                .content(outcome.resolution_text())
                .components(render::confirm_buttons(true)),
        )
        .await?;

    if outcome.proceeds() {
        let thread = data
            .help_desk(ctx)
            .open_thread(requester, &category.label)
            .await?;
        info!(thread = %thread.id, category = %category.key, "Created help thread from button");
    } else {
        debug!(?outcome, "Help thread not created");
    }
    Ok(())
}

/// Acknowledges a Yes/No press by disabling both buttons in place. The
/// collector in [`create_thread`] only reads the answer, so a prompt left
/// waiting across a restart is still answered here.
async fn settle_answer(
    ctx: &serenity::Context,
    interaction: &ComponentInteraction,
    control: &Control,
) -> Result<()> {
    debug!(message = %interaction.message.id, ?control, "Confirmation answer");
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .components(render::confirm_buttons(true)),
            ),
        )
        .await?;
    Ok(())
}

/// Close button pinned in the thread.
async fn thread_close(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &ComponentInteraction,
) -> Result<()> {
    interaction.defer(ctx).await?;
    let Some(actor) = actor_of(interaction) else {
        return Ok(());
    };
    let outcome = data
        .help_desk(ctx)
        .close_thread(interaction.channel_id, &actor, Method::Button)
        .await?;
    if outcome != Transition::Applied {
        debug!(channel = %interaction.channel_id, ?outcome, "Close button had no effect");
    }
    Ok(())
}

/// The thread a log entry refers to. When it cannot be found, every control
/// on the entry is disabled and the presser is told so.
async fn logged_thread(
    ctx: &serenity::Context,
    desk: &HelpDesk<SerenityPlatform>,
    interaction: &ComponentInteraction,
) -> Result<Option<serenity::ChannelId>> {
    let footer = interaction
        .message
        .embeds
        .first()
        .and_then(|embed| embed.footer.as_ref())
        .and_then(|footer| parse_footer(&footer.text));
    let found = match footer {
        Some(thread) => match desk.resolve(thread).await {
            Ok(_) => Some(thread),
            Err(Error::NotFound { .. }) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };
    if found.is_none() {
        interaction
            .edit_response(
                ctx,
                serenity::EditInteractionResponse::new()
                    .components(render::disable_all(&interaction.message.components)),
            )
            .await?;
        followup(ctx, interaction, MISSING_THREAD).await?;
    }
    Ok(found)
}

/// Disables just the pressed button on a log entry; a fresh entry with live
/// buttons follows the transition.
async fn retire_pressed(ctx: &serenity::Context, interaction: &ComponentInteraction) -> Result<()> {
    let rows = render::retire_button(
        &interaction.message.components,
        &interaction.data.custom_id,
    );
    interaction
        .edit_response(ctx, serenity::EditInteractionResponse::new().components(rows))
        .await?;
    Ok(())
}

/// "View" on a log entry: adds the presser to the thread.
async fn log_view(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &ComponentInteraction,
) -> Result<()> {
    interaction.defer(ctx).await?;
    let desk = data.help_desk(ctx);
    let Some(thread) = logged_thread(ctx, &desk, interaction).await? else {
        return Ok(());
    };
    let text = match desk.view_thread(thread, interaction.user.id).await? {
        ViewOutcome::AlreadyMember => format!("You can already access that thread -> <#{thread}>"),
        ViewOutcome::Added => format!("You have been added to the thread -> <#{thread}>"),
    };
    followup(ctx, interaction, text).await
}

/// "Close" on a log entry. Staff only.
async fn log_close(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &ComponentInteraction,
) -> Result<()> {
    interaction.defer(ctx).await?;
    let Some(actor) = actor_of(interaction) else {
        return Ok(());
    };
    let desk = data.help_desk(ctx);
    let Some(thread) = logged_thread(ctx, &desk, interaction).await? else {
        return Ok(());
    };
    match desk.close_thread(thread, &actor, Method::LogButton).await? {
        Transition::Applied => retire_pressed(ctx, interaction).await,
        Transition::Unchanged => followup(ctx, interaction, "That thread is already closed.").await,
        Transition::NotHelpThread => followup(ctx, interaction, MISSING_THREAD).await,
    }
}

/// "Re-open" on a log entry. Staff only.
async fn log_reopen(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &ComponentInteraction,
) -> Result<()> {
    interaction.defer(ctx).await?;
    let Some(actor) = actor_of(interaction) else {
        return Ok(());
    };
    let desk = data.help_desk(ctx);
    let Some(thread) = logged_thread(ctx, &desk, interaction).await? else {
        return Ok(());
    };
    match desk.reopen_thread(thread, &actor).await? {
        Transition::Applied => retire_pressed(ctx, interaction).await,
        Transition::Unchanged => followup(ctx, interaction, "That thread is already open.").await,
        Transition::NotHelpThread => followup(ctx, interaction, MISSING_THREAD).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_handler() {
        let registry = ControlRegistry::new();
        for kind in ControlKind::ALL {
            assert!(registry.handles(kind), "{kind:?} has no handler");
        }
    }

    #[test]
    fn test_registry_keys_match_parsed_ids() {
        let registry = ControlRegistry::new();
        for control in [
            Control::Create("general".to_string()),
            Control::ThreadClose,
            Control::LogView,
            Control::LogClose,
            Control::LogReopen,
        ] {
            let parsed = Control::parse(&control.custom_id()).map(|c| c.kind());
            assert!(parsed.is_some_and(|kind| registry.handles(kind)));
        }
    }
}

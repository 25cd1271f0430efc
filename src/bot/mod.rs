//! Bot layer - Discord-specific interface, commands and event handlers
//!
//! This module wires the help desk into poise: prefix commands, the
//! persistent button registry and the gateway events that drive automatic
//! cleanup and closing.

/// Poise command checks
pub mod checks;
/// Prefix command implementations
pub mod commands;
/// Gateway event and button handlers
pub mod handlers;
/// Discord-backed [`HelpPlatform`](crate::core::platform::HelpPlatform)
pub mod platform;
/// Embeds and buttons
pub mod render;

use crate::{
    config::AppConfig,
    core::{HelpSettings, access::AccessPolicy, lifecycle::HelpDesk},
    errors::{Error, Result},
};
use handlers::ControlRegistry;
use platform::SerenityPlatform;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Shared data available to all commands and handlers.
pub struct BotData {
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
    /// Typed ids derived from the config
    pub settings: HelpSettings,
    /// Handlers for the persistent buttons
    pub controls: ControlRegistry,
}

impl BotData {
    /// Builds the shared state, including the button registry.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        let settings = config.help.settings();
        Self {
            config,
            settings,
            controls: ControlRegistry::new(),
        }
    }

    /// A help desk over the live connection.
    #[must_use]
    pub fn help_desk(&self, ctx: &serenity::Context) -> HelpDesk<SerenityPlatform> {
        HelpDesk::new(SerenityPlatform::new(ctx), self.settings)
    }

    /// The access policy for the configured roles.
    #[must_use]
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::from(&self.settings)
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } if error.is_user_facing() => {
            debug!("Command `{}` refused: {}", ctx.command().name, error);
            if let Err(e) = ctx.say(error.to_string()).await {
                warn!("Failed to send refusal: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say("An error occurred while running that command.").await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => match error {
            Some(e) => warn!("Check for `{}` errored: {}", ctx.command().name, e),
            None => debug!("Check for `{}` failed", ctx.command().name),
        },
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            debug!("Non-owner {} tried `{}`", ctx.author().id, ctx.command().name);
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            debug!("Missing permissions for `{}`", ctx.command().name);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {}: {:?}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and runs until the client stops.
#[instrument(skip(token, config))]
pub async fn run_bot(token: String, config: Arc<AppConfig>) -> Result<()> {
    let prefix = config.prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::help_menu(),
                commands::close(),
                commands::topic(),
                commands::openthreads(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                let data = BotData::new(config);
                info!(
                    help_channel = %data.settings.help_channel,
                    categories = data.config.help.categories.len(),
                    "Help desk ready"
                );
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

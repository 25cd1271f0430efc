//! Settings read from the process environment (after `.env` is loaded).

use crate::errors::{Error, Result};
use std::path::PathBuf;

/// Environment variable holding the Discord bot token.
pub const TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_VAR: &str = "HELPDESK_CONFIG";

/// Reads the bot token. It is loaded right before use and never stored in
/// [`super::AppConfig`].
pub fn bot_token() -> Result<String> {
    std::env::var(TOKEN_VAR)
        .inspect_err(|e| tracing::error!("{TOKEN_VAR} not found: {e}"))
        .map_err(Error::EnvVar)
}

/// Path of the configuration file, `config.toml` unless overridden.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR).map_or_else(|| PathBuf::from("config.toml"), PathBuf::from)
}

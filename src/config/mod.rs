//! Configuration loading for the help desk bot.
//!
//! The channel and role identifiers are fixed for the lifetime of the process
//! and come from `config.toml`; the bot token comes from the environment.

/// Help channel, log channel, roles and thread categories from `config.toml`
pub mod help;

/// Environment-provided settings (token, config path)
pub mod env;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub use help::{ButtonColour, CategoryConfig, HelpConfig};

/// Default prefix for text commands when `config.toml` does not set one.
pub const DEFAULT_PREFIX: &str = "=";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Prefix for text commands
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Help desk channels, roles and categories
    pub help: HelpConfig,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl AppConfig {
    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(Error::Config {
                message: "Command prefix cannot be empty".to_string(),
            });
        }
        self.help.validate()
    }
}

/// Parses and validates configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or fail validation
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `HELPDESK_CONFIG`, falling back to `./config.toml`.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::config_path();
    let config = load_config(&path)
        .inspect_err(|e| tracing::error!("Critical error loading configuration: {}", e))?;
    tracing::info!(
        help_channel = config.help.channel_id,
        categories = config.help.categories.len(),
        "Loaded configuration from {}",
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"
        prefix = "!"

        [help]
        channel_id = 890674348313157703
        log_channel_id = 890674366776475769
        helper_role_id = 916051595794448396
        staff_role_id = 916051618187870280
        guide_path = "helpguide.txt"

        [[help.categories]]
        key = "nextcord"
        label = "Nextcord"
        colour = "danger"

        [[help.categories]]
        key = "python"
        label = "Python"
        colour = "success"
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.help.channel_id, 890_674_348_313_157_703);
        assert_eq!(config.help.staff_role_id, 916_051_618_187_870_280);
        assert_eq!(config.help.categories.len(), 2);
        assert_eq!(config.help.categories[1].label, "Python");
        assert_eq!(config.help.categories[1].colour, ButtonColour::Success);
    }

    #[test]
    fn test_prefix_and_categories_default() {
        let config = parse_config(
            r"
            [help]
            channel_id = 1
            log_channel_id = 2
            helper_role_id = 3
            staff_role_id = 4
            ",
        )
        .unwrap();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.help.categories.len(), 1);
        assert_eq!(config.help.categories[0].key, "general");
        assert_eq!(config.help.guide_path.to_str(), Some("helpguide.txt"));
    }

    #[test]
    fn test_missing_help_table_is_config_error() {
        let err = parse_config("prefix = \"=\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

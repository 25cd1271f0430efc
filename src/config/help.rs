//! The `[help]` table: where help threads live and who may manage them.

use crate::{
    core::HelpSettings,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Button colours a category may use on the creation prompt.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColour {
    /// Blurple
    #[default]
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
}

/// One kind of help a user can ask for, shown as a button on the prompt.
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Stable key embedded in the button's custom id
    pub key: String,
    /// Human readable label, also used in the thread name
    pub label: String,
    /// Button colour
    #[serde(default)]
    pub colour: ButtonColour,
}

/// Help desk configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct HelpConfig {
    /// Channel under which help threads are created
    pub channel_id: u64,
    /// Channel receiving open/close/re-open log entries
    pub log_channel_id: u64,
    /// Role pinged in new threads; may close and retitle
    pub helper_role_id: u64,
    /// Moderator role; may additionally re-open threads
    pub staff_role_id: u64,
    /// Text file posted by `help_menu`
    #[serde(default = "default_guide_path")]
    pub guide_path: PathBuf,
    /// Buttons on the creation prompt
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

fn default_guide_path() -> PathBuf {
    PathBuf::from("helpguide.txt")
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![CategoryConfig {
        key: "general".to_string(),
        label: "General".to_string(),
        colour: ButtonColour::Primary,
    }]
}

impl HelpConfig {
    /// Rejects zero ids and category keys that would not survive a round
    /// trip through a custom id.
    pub fn validate(&self) -> Result<()> {
        let ids = [
            ("channel_id", self.channel_id),
            ("log_channel_id", self.log_channel_id),
            ("helper_role_id", self.helper_role_id),
            ("staff_role_id", self.staff_role_id),
        ];
        if let Some((name, _)) = ids.iter().find(|(_, id)| *id == 0) {
            return Err(Error::Config {
                message: format!("help.{name} must be a non-zero Discord id"),
            });
        }

        if self.categories.is_empty() {
            return Err(Error::Config {
                message: "help.categories must contain at least one category".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let valid_key = !category.key.is_empty()
                && category.key.len() <= 32
                && category
                    .key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid_key {
                return Err(Error::Config {
                    message: format!(
                        "Invalid category key {:?}: use 1-32 ASCII letters, digits, '-' or '_'",
                        category.key
                    ),
                });
            }
            if !seen.insert(category.key.as_str()) {
                return Err(Error::Config {
                    message: format!("Duplicate category key {:?}", category.key),
                });
            }
        }
        Ok(())
    }

    /// Looks up a category by the key carried in a create button.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Typed identifiers for the lifecycle manager.
    #[must_use]
    pub fn settings(&self) -> HelpSettings {
        HelpSettings {
            help_channel: serenity::ChannelId::new(self.channel_id),
            log_channel: serenity::ChannelId::new(self.log_channel_id),
            helper_role: serenity::RoleId::new(self.helper_role_id),
            staff_role: serenity::RoleId::new(self.staff_role_id),
        }
    }
}

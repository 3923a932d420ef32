//! Configuration management

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::errors::ConfigError;

/// Bot configuration, stored as a JSON file next to the executable.
///
/// Every field is optional at parse time so a half-filled file still loads;
/// `validate` is the single place that decides whether the bot may start.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub bot_username: String,
    #[serde(default)]
    pub oauth_token: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub goodbye: String,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub competing_bot: Option<CompetingBotConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompetingBotConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub reaction_messages: Vec<String>,
}

impl Config {
    /// Scaffold with every field present but empty, for first-run generation.
    pub fn template() -> Self {
        Self {
            competing_bot: Some(CompetingBotConfig::default()),
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), json)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {}", e)))
    }

    /// A competing bot is configured iff its username is non-blank.
    pub fn has_competing_bot(&self) -> bool {
        self.competing_bot
            .as_ref()
            .is_some_and(|rival| !rival.username.trim().is_empty())
    }

    /// Check every required field, reporting each problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.bot_username.trim().is_empty() {
            error!("No bot_username provided");
            missing.push("bot_username");
        }
        if self.oauth_token.trim().is_empty() {
            error!("No oauth_token provided");
            missing.push("oauth_token");
        }
        if self.channel.trim().is_empty() {
            error!("No channel provided");
            missing.push("channel");
        }
        if self.command.trim().is_empty() {
            error!("No command provided. Example: !motivation");
            missing.push("command");
        }
        if self.greeting.trim().is_empty() {
            error!("No greeting provided. Example: Hello, I'm {{BOT_NAME}}. Just type {{COMMAND}} and I'll respond");
            missing.push("greeting");
        }
        if self.goodbye.trim().is_empty() {
            error!("No goodbye provided. Example: Okay, bye for now!");
            missing.push("goodbye");
        }
        if self.messages.is_empty() {
            error!("No messages provided. Example: {{USER}}, you are great!");
            missing.push("messages");
        }

        if let Some(rival) = self
            .competing_bot
            .as_ref()
            .filter(|rival| !rival.username.trim().is_empty())
        {
            if rival.command.trim().is_empty() {
                error!("No command provided for the competing bot. Example: !demotivation");
                missing.push("competing_bot.command");
            }
            if rival.reaction_messages.is_empty() {
                error!("No reaction_messages provided for the competing bot. Example: Don't listen to {{COMPETING_BOT_NAME}}, {{USER}}!");
                missing.push("competing_bot.reaction_messages");
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields(missing.join(", ")))
        }
    }
}

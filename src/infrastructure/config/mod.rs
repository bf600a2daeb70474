//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::application::messaging::{RecoveryPlan, ReplyPolicy};

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub chat: ChatConfig,
    pub reply: ReplyConfig,
    pub recovery: RecoveryConfig,
    pub lookup: LookupConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChatConfig {
    /// Leading text marking lines we accept commands from
    pub scope_prefixes: Vec<String>,
    pub rejection_prefix: String,
    pub command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplyConfig {
    pub mode: ReplyPolicy,
    pub channel_command: String,
    pub direct_command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecoveryConfig {
    pub delay_ms: u64,
    pub warning: String,
    pub fillers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LookupConfig {
    pub identity_url: String,
    pub stats_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelayConfig {
    pub enabled: bool,
    pub channel_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "statcheck".to_string(),
            },
            chat: ChatConfig {
                scope_prefixes: vec!["Officer".to_string()],
                rejection_prefix: "You cannot say".to_string(),
                command: "sc".to_string(),
            },
            reply: ReplyConfig {
                mode: ReplyPolicy::Broadcast,
                channel_command: "/oc".to_string(),
                direct_command: "/msg".to_string(),
            },
            recovery: RecoveryConfig {
                delay_ms: 250,
                warning: "flagged for spam!".to_string(),
                fillers: vec!["a".to_string(), "b".to_string()],
            },
            lookup: LookupConfig {
                identity_url: "https://api.mojang.com/users/profiles/minecraft".to_string(),
                stats_url: "https://api.hypixel.net/player".to_string(),
                api_key: None,
            },
            relay: RelayConfig {
                enabled: false,
                channel_id: None,
            },
        }
    }
}

impl RecoveryConfig {
    pub fn plan(&self) -> RecoveryPlan {
        RecoveryPlan {
            delay: Duration::from_millis(self.delay_ms),
            warning: self.warning.clone(),
            fillers: self.fillers.clone(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override values from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(key) = var("HYPIXEL_API_KEY").or_else(|| var("API_KEY")) {
            self.lookup.api_key = Some(key);
        }

        if let Some(channel) = var("RELAY_CHANNEL_ID").or_else(|| var("DISCORD_CHANNEL_ID")) {
            self.relay.channel_id = Some(channel);
            self.relay.enabled = true;
        }

        if let Some(mode) = var("REPLY_MODE") {
            self.reply.mode = mode.parse().map_err(ConfigError::InvalidValue)?;
        }

        if let Some(delay) = var("RECOVERY_DELAY_MS") {
            self.recovery.delay_ms = delay
                .parse::<u64>()
                .ok()
                .filter(|&ms| ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue(format!("RECOVERY_DELAY_MS: {}", delay)))?;
        }

        Ok(())
    }

    /// Check the values `run` and `check` depend on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("lookup.api-key (or HYPIXEL_API_KEY)".to_string()));
        }
        if self.chat.scope_prefixes.is_empty() {
            return Err(ConfigError::MissingField("chat.scope-prefixes".to_string()));
        }
        if self.chat.command.trim().is_empty() {
            return Err(ConfigError::MissingField("chat.command".to_string()));
        }
        // Recovery sends are ordered only by their timer offsets
        if self.recovery.delay_ms == 0 {
            return Err(ConfigError::InvalidValue("recovery.delay-ms must be greater than 0".to_string()));
        }
        if self.relay.enabled && self.relay.channel_id.is_none() {
            return Err(ConfigError::MissingField("relay.channel-id".to_string()));
        }
        Ok(())
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::account_config::AccountConfig;
use crate::config::server_config::{ReconnectConfig, ServerConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("config file not found")]
    NotFound,
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("io error reading config: {0}")]
    Io(String),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Anti-idle camera action settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntiIdleConfig {
    pub enabled: bool,
    /// Seconds between camera nudges.
    pub interval_secs: u64,
}

impl Default for AntiIdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoostConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountConfig>,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    #[serde(default)]
    pub anti_idle: AntiIdleConfig,
}

impl RoostConfig {
    pub fn config_path() -> Result<PathBuf, ConfigLoadError> {
        let dirs = ProjectDirs::from("", "", "roost").ok_or(ConfigLoadError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        let config =
            toml::from_str(&content).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self)?;
        fs::write(&path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: RoostConfig = toml::from_str("").unwrap();
        assert!(config.servers.is_empty());
        assert!(config.reconnect.enabled);
        assert_eq!(config.reconnect.delay_secs, 120);
        assert_eq!(config.anti_idle.interval_secs, 30);
    }

    #[test]
    fn sections_parse() {
        let config: RoostConfig = toml::from_str(
            r#"
            [servers.main]
            host = "mc.example.net"
            port = 25565

            [accounts.afk]
            username = "BotAFK"

            [reconnect]
            delay_secs = 60
            throttled_delay_secs = 300

            [anti_idle]
            interval_secs = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.servers["main"].host, "mc.example.net");
        assert_eq!(config.accounts["afk"].username, "BotAFK");
        assert!(config.accounts["afk"].password.is_none());
        assert_eq!(config.reconnect.delay_secs, 60);
        assert_eq!(config.anti_idle.interval_secs, 45);
    }
}

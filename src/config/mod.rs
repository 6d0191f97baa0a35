//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::cache::CacheSettings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Riot API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    /// API key. The `RIOT_API_KEY` environment variable overrides this.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_riot_timeout")]
    pub timeout_seconds: u64,

    /// Pin a Data Dragon version instead of resolving the latest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddragon_version: Option<String>,
}

fn default_riot_timeout() -> u64 {
    5
}

impl Default for RiotConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_seconds: default_riot_timeout(),
            ddragon_version: None,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached summoners.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Overall budget for one summoner fetch (all upstream requests).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

fn default_capacity() -> usize {
    256
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            fetch_timeout_seconds: default_fetch_timeout(),
        }
    }
}

impl CacheConfig {
    /// Convert to runtime cache settings.
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            capacity: self.capacity,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_seconds),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub riot: RiotConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    ///
    /// A missing file is routine; an unreadable or invalid one is an
    /// error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.riot.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Riot API timeout must be greater than 0".to_string(),
            ));
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Cache capacity must be greater than 0".to_string(),
            ));
        }

        if self.cache.fetch_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Cache fetch timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Effective API key: the environment wins over the file.
    pub fn riot_api_key(&self) -> String {
        std::env::var("RIOT_API_KEY").unwrap_or_else(|_| self.riot.api_key.clone())
    }
}

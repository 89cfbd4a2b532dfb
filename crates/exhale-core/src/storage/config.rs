//! TOML-based application configuration.
//!
//! Stores:
//! - backend API endpoint and timeout
//! - pricing defaults used when the profile carries no pack price
//! - outbox retry budget and backoff
//!
//! Configuration is stored at `~/.config/exhale/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pricing defaults for progress metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_pack_price")]
    pub pack_price: f64,
    #[serde(default = "default_cigarettes_per_pack")]
    pub cigarettes_per_pack: u32,
}

/// Outbox retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_backoff_secs")]
    pub base_backoff_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/exhale/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub outbox: OutboxConfig,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_pack_price() -> f64 {
    10.0
}
fn default_cigarettes_per_pack() -> u32 {
    20
}
fn default_max_attempts() -> u32 {
    5
}
fn default_base_backoff_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            pack_price: default_pack_price(),
            cigarettes_per_pack: default_cigarettes_per_pack(),
        }
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_secs: default_base_backoff_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            pricing: PricingConfig::default(),
            outbox: OutboxConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "pricing.pack_price" => Some(self.pricing.pack_price.to_string()),
            "pricing.cigarettes_per_pack" => Some(self.pricing.cigarettes_per_pack.to_string()),
            "outbox.max_attempts" => Some(self.outbox.max_attempts.to_string()),
            "outbox.base_backoff_secs" => Some(self.outbox.base_backoff_secs.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-separated key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "api.base_url" => self.api.base_url = value.to_string(),
            "api.timeout_secs" => {
                self.api.timeout_secs = value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            "pricing.pack_price" => {
                self.pricing.pack_price = value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            "pricing.cigarettes_per_pack" => {
                self.pricing.cigarettes_per_pack =
                    value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            "outbox.max_attempts" => {
                self.outbox.max_attempts = value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            "outbox.base_backoff_secs" => {
                self.outbox.base_backoff_secs =
                    value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        self.save()?;
        Ok(())
    }
}

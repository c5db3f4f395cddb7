//! # tsafe-config
//!
//! Configuration management for the tsafe guard.
//!
//! Loads configuration from:
//! 1. `$TSAFE_CONFIG` if set, otherwise `~/.tsafe/config.toml`
//! 2. Environment variables (highest priority)

pub mod logging;

pub use logging::{init_logging, LogLevel};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Explicit config file path, overrides the global location.
pub const ENV_CONFIG_PATH: &str = "TSAFE_CONFIG";
pub const ENV_AUTO_INIT: &str = "TSAFE_AUTO_INIT";
pub const ENV_LOG: &str = "TSAFE_LOG";

/// Global config instance. Holds defaults until the first `reload`.
static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Get global config (read-only)
pub fn config() -> std::sync::RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reload config from disk. On error the previous value is kept.
pub fn reload() -> Result<(), ConfigError> {
    let new_config = Config::load()?;
    *CONFIG.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = new_config;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub guard: GuardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the standard location, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a single config file without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// `$TSAFE_CONFIG`, falling back to `~/.tsafe/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        match std::env::var_os(ENV_CONFIG_PATH) {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => Self::global_config_path(),
        }
    }

    /// Global config path: ~/.tsafe/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tsafe/config.toml"))
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_AUTO_INIT) {
            self.guard.auto_init = parse_flag(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_AUTO_INIT,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_LOG) {
            self.logging.level = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG,
                value,
            })?;
        }
        Ok(())
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Guard behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Initialize from the process environment when the library is loaded.
    /// When false the host must call `tsafe_init` itself.
    pub auto_init: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { auto_init: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
        }
    }
}

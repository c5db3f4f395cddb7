//! Structured logging utilities for tsafe components.
//!
//! Provides consistent logging with component prefixes and structured fields.
//!
//! # Usage
//!
//! ```ignore
//! use tsafe_config::logging::*;
//!
//! log_guard_info!("Checking enabled", trigger = "pthread_create");
//! log_preload_debug!("Config loaded", auto_init = true);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const GUARD: &'static str = "GUARD";
    pub const PRELOAD: &'static str = "PRELOAD";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
        .into_iter()
        .find(|level| level.as_filter().eq_ignore_ascii_case(s))
        .ok_or(())
    }
}

// === GUARD logging macros ===

#[macro_export]
macro_rules! log_guard_error {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::error!(component = $crate::logging::Component::GUARD, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_guard_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::GUARD, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_guard_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::GUARD, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_guard_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::GUARD, $($key = $value,)* $msg)
    };
}

// === PRELOAD logging macros ===

#[macro_export]
macro_rules! log_preload_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::PRELOAD, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_preload_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::PRELOAD, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_preload_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::PRELOAD, $($key = $value,)* $msg)
    };
}

/// Initialize logging with the given level filter.
/// `RUST_LOG` takes precedence when set. `LogLevel::Off` installs nothing.
/// Returns false if a subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    use tracing_subscriber::EnvFilter;

    if level == LogLevel::Off {
        return false;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

//! Runtime configuration
//!
//! Logging and task queue settings, loaded from JSON. Every field has a
//! default, so `{}` is a valid configuration.
//!
//! # Usage
//!
//! ```rust
//! use yaoxiang_promise::util::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_json_str(r#"{ "queue": { "name": "mail" } }"#).unwrap();
//! assert_eq!(config.queue.name, "mail");
//! assert!(config.queue.log_rejections);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::runtime::scheduler::{QueueConfig, TaskQueue};
use crate::util::logger::{self, LogLevel};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Task queue settings
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Maximum level that gets printed
    #[serde(default = "default_level")]
    pub level: LogLevel,
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::ParseError)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(ConfigError::IoError)?;
        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON file, or defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write configuration as pretty JSON.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        fs::write(path.as_ref(), content).map_err(ConfigError::IoError)
    }

    /// Install the global logger at the configured level.
    pub fn init_logger(&self) {
        logger::init_with_level(self.log.level);
    }

    /// Create a task queue with the configured settings.
    pub fn task_queue(&self) -> TaskQueue {
        TaskQueue::with_config(self.queue.clone())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[source] std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(#[source] serde_json::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(#[source] serde_json::Error),
}

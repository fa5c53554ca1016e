/*!
 * Configuration types for StatusGate
 */

use serde::{Deserialize, Serialize};
use statusgate_core_status::SchedulerConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StatusGateError};

/// Main configuration for the StatusGate host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusGateConfig {
    /// JSON status document read on every fetch
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    /// Base delay between background fetches in seconds
    #[serde(default = "default_background_interval")]
    pub background_interval_secs: u64,

    /// Upper bound for the background delay after repeated failures
    #[serde(default = "default_max_background_interval")]
    pub max_background_interval_secs: u64,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Re-check scheduling for the orchestrator
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Default for StatusGateConfig {
    fn default() -> Self {
        Self {
            status_file: default_status_file(),
            background_interval_secs: default_background_interval(),
            max_background_interval_secs: default_max_background_interval(),
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_status_file() -> PathBuf {
    PathBuf::from("status.json")
}

fn default_background_interval() -> u64 {
    60
}

fn default_max_background_interval() -> u64 {
    3600
}

impl StatusGateConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StatusGateConfig =
            toml::from_str(&contents).map_err(|e| StatusGateError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| StatusGateError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.background_interval_secs == 0 {
            return Err(StatusGateError::Config(
                "background_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_background_interval_secs < self.background_interval_secs {
            return Err(StatusGateError::Config(
                "max_background_interval_secs must not be below background_interval_secs"
                    .to_string(),
            ));
        }

        self.scheduler.validate()?;
        Ok(())
    }

    pub fn background_interval(&self) -> Duration {
        Duration::from_secs(self.background_interval_secs)
    }

    pub fn max_background_interval(&self) -> Duration {
        Duration::from_secs(self.max_background_interval_secs)
    }
}

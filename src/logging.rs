/*!
 * Logging setup for the status host
 *
 * Stdout is reserved for command results (`check` prints one outcome line),
 * and the console overlay draws its banner on stderr. Log records therefore
 * go either to stderr, interleaved with the banner, or as JSON lines to the
 * configured log file.
 */

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::StatusGateConfig;
use crate::error::{Result, StatusGateError};

/// Where log records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Human-readable records on stderr, next to the overlay banner
    Stderr { ansi: bool },
    /// JSON lines appended to a file
    File(PathBuf),
}

impl LogTarget {
    /// Pick the target for a configuration. Colours follow the terminal.
    pub fn from_config(config: &StatusGateConfig) -> Self {
        match &config.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => LogTarget::Stderr {
                ansi: console::Term::stderr().features().colors_supported(),
            },
        }
    }
}

/// Resolve the effective log level; `verbose` wins over `log_level`
pub fn effective_level(config: &StatusGateConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

/// Filter directives covering the host and the orchestrator crate
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("statusgate={level},statusgate_core_status={level}")
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
pub fn build_filter(config: &StatusGateConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(default_directives(effective_level(config)))
        .map_err(|e| StatusGateError::Logging(format!("invalid log filter: {}", e)))
}

/// Install the global subscriber for the host process
pub fn init_logging(config: &StatusGateConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let installed = match LogTarget::from_config(config) {
        LogTarget::Stderr { ansi } => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .json(),
                )
                .try_init()
        }
    };

    installed.map_err(|e| StatusGateError::Logging(e.to_string()))
}

/// Log files are appended to so a restarted watcher keeps its history
fn open_log_file(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            StatusGateError::Logging(format!("cannot open log file {}: {}", path.display(), e))
        })
}

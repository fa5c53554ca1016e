/*!
 * StatusGate - remote kill switch and forced-upgrade watcher
 *
 * Embeds the status orchestrator with:
 * - A file-backed status source (JSON status document)
 * - A console overlay as the blocking surface
 * - A background fetch loop with failure backoff
 * - TOML configuration and structured logging
 */

pub mod background;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod overlay;
pub mod source;

// Re-export commonly used types
pub use background::BackgroundFetcher;
pub use config::{LogLevel, StatusGateConfig};
pub use error::{Result, StatusGateError};
pub use host::StatusGate;
pub use overlay::ConsoleOverlay;
pub use source::FileStatusSource;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

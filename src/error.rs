/*!
 * Error types for StatusGate
 */

use statusgate_core_status::{BackgroundFetchResult, ConfigError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusGateError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RESTRICTED: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_FETCH_FAILED: i32 = 3;

#[derive(Error, Debug)]
pub enum StatusGateError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scheduler bounds rejected by the orchestrator
    #[error("Invalid scheduler configuration: {0}")]
    Scheduler(#[from] ConfigError),

    /// Configuration file could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Logging could not be initialised
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StatusGateError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }
}

/// Exit code reported by a one-shot check
pub fn exit_code_for(result: BackgroundFetchResult) -> i32 {
    match result {
        BackgroundFetchResult::NewData => EXIT_SUCCESS,
        BackgroundFetchResult::NoData => EXIT_RESTRICTED,
        BackgroundFetchResult::Failed => EXIT_FETCH_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_fatal() {
        let err = StatusGateError::Config("missing status file".to_string());
        assert_eq!(err.exit_code(), EXIT_FATAL);

        let err = StatusGateError::Scheduler(ConfigError::ZeroMinInterval);
        assert_eq!(err.exit_code(), EXIT_FATAL);
        assert!(err.to_string().contains("min_retry_interval"));
    }

    #[test]
    fn test_io_conversion() {
        let err: StatusGateError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StatusGateError::Io(_)));
    }

    #[test]
    fn test_exit_code_for_outcome() {
        assert_eq!(exit_code_for(BackgroundFetchResult::NewData), EXIT_SUCCESS);
        assert_eq!(exit_code_for(BackgroundFetchResult::NoData), EXIT_RESTRICTED);
        assert_eq!(exit_code_for(BackgroundFetchResult::Failed), EXIT_FETCH_FAILED);
    }
}

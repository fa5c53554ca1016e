//! Error types for the status orchestration crate

use thiserror::Error;

/// Reasons a status fetch produced no usable status.
///
/// The orchestrator never propagates these; any variant is treated as
/// "no definitive status" by the decision logic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport failed to reach the status endpoint
    #[error("status transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be interpreted as a status
    #[error("invalid status payload: {0}")]
    InvalidPayload(String),

    /// The status source has nothing to report
    #[error("status unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while validating orchestrator configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_retry_interval must be greater than zero")]
    ZeroMinInterval,

    #[error("max_retry_interval ({max:?}) must not be below min_retry_interval ({min:?})")]
    InvertedBounds {
        min: std::time::Duration,
        max: std::time::Duration,
    },

    #[error("fallback_retry_interval ({0:?}) lies outside the configured bounds")]
    FallbackOutOfBounds(std::time::Duration),
}

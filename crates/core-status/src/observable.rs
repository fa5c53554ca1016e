//! The availability status reported by a status source

use serde::{Deserialize, Serialize};

/// A single fetched availability status.
///
/// Created once per successful fetch and never mutated afterwards. When both
/// `api_inactive` and `force_update_required` are set, the block wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusObservable {
    /// Kill switch engaged for this client
    #[serde(default)]
    pub api_inactive: bool,

    /// Client version is no longer accepted
    #[serde(default)]
    pub force_update_required: bool,

    /// Suggested delay before the next re-check while blocked
    #[serde(default)]
    pub retry_interval_seconds: f64,

    /// Text to show on the blocking surface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
}

impl StatusObservable {
    /// Status of a fully operational service
    pub fn operational() -> Self {
        Self::default()
    }

    /// Status with the kill switch engaged
    pub fn blocked(retry_interval_seconds: f64) -> Self {
        Self {
            api_inactive: true,
            retry_interval_seconds,
            ..Default::default()
        }
    }

    /// Status demanding a client upgrade
    pub fn upgrade_required() -> Self {
        Self {
            force_update_required: true,
            ..Default::default()
        }
    }

    /// Attach a message for the blocking surface
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    pub fn api_inactive(&self) -> bool {
        self.api_inactive
    }

    pub fn force_update(&self) -> bool {
        self.force_update_required
    }

    pub fn user_message(&self) -> Option<&str> {
        self.user_message.as_deref()
    }
}

//! Scheduler configuration
//!
//! Bounds for the status-supplied retry interval and the policy applied when a
//! status fetch fails.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the orchestrator does with an engaged surface when a fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail open: treat a missing status as "recovered" and lift the block
    #[default]
    Disengage,

    /// Fail closed: keep blocking and re-check after the fallback interval
    KeepEngaged,
}

/// Configuration for re-check scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Shortest delay a status may request between re-checks
    #[serde(with = "duration_secs", default = "default_min_retry")]
    pub min_retry_interval: Duration,

    /// Longest delay a status may request between re-checks
    #[serde(with = "duration_secs", default = "default_max_retry")]
    pub max_retry_interval: Duration,

    /// Delay used when the status carries no usable interval
    #[serde(with = "duration_secs", default = "default_fallback_retry")]
    pub fallback_retry_interval: Duration,

    /// Handling of fetch failures while blocked
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_retry_interval: default_min_retry(),
            max_retry_interval: default_max_retry(),
            fallback_retry_interval: default_fallback_retry(),
            failure_policy: FailurePolicy::Disengage,
        }
    }
}

impl SchedulerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_retry_interval.is_zero() {
            return Err(ConfigError::ZeroMinInterval);
        }

        if self.max_retry_interval < self.min_retry_interval {
            return Err(ConfigError::InvertedBounds {
                min: self.min_retry_interval,
                max: self.max_retry_interval,
            });
        }

        if self.fallback_retry_interval < self.min_retry_interval
            || self.fallback_retry_interval > self.max_retry_interval
        {
            return Err(ConfigError::FallbackOutOfBounds(
                self.fallback_retry_interval,
            ));
        }

        Ok(())
    }

    /// Turn a status-supplied interval in seconds into a bounded delay.
    ///
    /// Non-finite and non-positive values fall back to
    /// `fallback_retry_interval`.
    pub fn bound_interval(&self, seconds: f64) -> Duration {
        if !seconds.is_finite() || seconds <= 0.0 {
            return self.fallback_retry_interval;
        }

        match Duration::try_from_secs_f64(seconds) {
            Ok(requested) => requested.clamp(self.min_retry_interval, self.max_retry_interval),
            Err(_) => self.max_retry_interval,
        }
    }
}

fn default_min_retry() -> Duration {
    Duration::from_secs(1)
}

fn default_max_retry() -> Duration {
    Duration::from_secs(3600)
}

fn default_fallback_retry() -> Duration {
    Duration::from_secs(30)
}

/// Durations are written as seconds in configuration files. Fractions are
/// kept so sub-second bounds survive a save and reload.
mod duration_secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(seconds)
            .map_err(|e| D::Error::custom(format!("invalid duration {}: {}", seconds, e)))
    }
}

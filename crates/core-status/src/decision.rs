//! Decision logic: maps a fetch result to exactly one reaction
//!
//! Pure functions only. The orchestrator applies the reaction; this module
//! just decides which one it is.

use crate::config::SchedulerConfig;
use crate::error::FetchError;
use crate::observable::StatusObservable;
use std::time::Duration;

/// Reaction chosen for one fetch result
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Kill switch engaged: show the surface and re-check later
    Block { retry_after: Duration },

    /// Client must upgrade
    ForceUpdate,

    /// Service operational: lift any block
    Clear,

    /// No definitive status was obtained
    FetchFailed,
}

/// Outcome of one pass through the check path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A check was already in flight; this trigger was dropped
    AlreadyPending,
    Blocked,
    ForceUpdate,
    Cleared,
    Failed,
}

/// Three-way result handed back to a background-fetch scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundFetchResult {
    /// Still blocked or forced; nothing new for the scheduler
    NoData,

    /// The block cleared
    NewData,

    /// Status could not be obtained
    Failed,
}

/// Pick the reaction for a fetch result.
///
/// A block takes priority over a forced update: the upgrade only becomes
/// actionable once the block is lifted.
pub fn decide(result: &Result<StatusObservable, FetchError>, config: &SchedulerConfig) -> Reaction {
    match result {
        Ok(status) if status.api_inactive() => Reaction::Block {
            retry_after: config.bound_interval(status.retry_interval_seconds),
        },
        Ok(status) if status.force_update() => Reaction::ForceUpdate,
        Ok(_) => Reaction::Clear,
        Err(_) => Reaction::FetchFailed,
    }
}

impl From<&Reaction> for CheckOutcome {
    fn from(reaction: &Reaction) -> Self {
        match reaction {
            Reaction::Block { .. } => CheckOutcome::Blocked,
            Reaction::ForceUpdate => CheckOutcome::ForceUpdate,
            Reaction::Clear => CheckOutcome::Cleared,
            Reaction::FetchFailed => CheckOutcome::Failed,
        }
    }
}

impl From<CheckOutcome> for BackgroundFetchResult {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            // A concurrent check owns the fetch; nothing new to report here
            CheckOutcome::AlreadyPending => BackgroundFetchResult::NoData,
            CheckOutcome::Blocked | CheckOutcome::ForceUpdate => BackgroundFetchResult::NoData,
            CheckOutcome::Cleared => BackgroundFetchResult::NewData,
            CheckOutcome::Failed => BackgroundFetchResult::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SchedulerConfig {
        SchedulerConfig::default()
    }

    #[test]
    fn test_inactive_blocks_with_interval() {
        let reaction = decide(&Ok(StatusObservable::blocked(30.0)), &config());
        assert_eq!(
            reaction,
            Reaction::Block {
                retry_after: Duration::from_secs(30)
            }
        );
    }

    #[test]
    fn test_block_wins_over_force_update() {
        let status = StatusObservable {
            api_inactive: true,
            force_update_required: true,
            retry_interval_seconds: 10.0,
            user_message: None,
        };

        let reaction = decide(&Ok(status), &config());
        assert!(matches!(reaction, Reaction::Block { .. }));
    }

    #[test]
    fn test_force_update() {
        let reaction = decide(&Ok(StatusObservable::upgrade_required()), &config());
        assert_eq!(reaction, Reaction::ForceUpdate);
    }

    #[test]
    fn test_operational_clears() {
        let reaction = decide(&Ok(StatusObservable::operational()), &config());
        assert_eq!(reaction, Reaction::Clear);
    }

    #[test]
    fn test_error_is_fetch_failed() {
        let reaction = decide(
            &Err(FetchError::Transport("timeout".to_string())),
            &config(),
        );
        assert_eq!(reaction, Reaction::FetchFailed);
    }

    #[test]
    fn test_block_interval_is_bounded() {
        let reaction = decide(&Ok(StatusObservable::blocked(0.0)), &config());
        assert_eq!(
            reaction,
            Reaction::Block {
                retry_after: config().fallback_retry_interval
            }
        );
    }

    #[test]
    fn test_background_result_mapping() {
        assert_eq!(
            BackgroundFetchResult::from(CheckOutcome::Blocked),
            BackgroundFetchResult::NoData
        );
        assert_eq!(
            BackgroundFetchResult::from(CheckOutcome::ForceUpdate),
            BackgroundFetchResult::NoData
        );
        assert_eq!(
            BackgroundFetchResult::from(CheckOutcome::Cleared),
            BackgroundFetchResult::NewData
        );
        assert_eq!(
            BackgroundFetchResult::from(CheckOutcome::Failed),
            BackgroundFetchResult::Failed
        );
        assert_eq!(
            BackgroundFetchResult::from(CheckOutcome::AlreadyPending),
            BackgroundFetchResult::NoData
        );
    }
}

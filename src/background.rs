/*!
 * Background fetch scheduling
 *
 * Periodically drives `StatusOrchestrator::fetch_status` and adapts its own
 * cadence from the three-way outcome: failures back off exponentially up to a
 * ceiling, any definitive answer resets to the base interval.
 */

use statusgate_core_status::{BackgroundFetchResult, StatusOrchestrator};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::StatusGateConfig;

/// Cadence controller for background fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundFetcher {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl BackgroundFetcher {
    /// Create a fetcher; `max` below `base` is raised to `base`
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            current: base,
        }
    }

    pub fn from_config(config: &StatusGateConfig) -> Self {
        Self::new(config.background_interval(), config.max_background_interval())
    }

    /// Delay before the next fetch
    pub fn current_delay(&self) -> Duration {
        self.current
    }

    /// Fold a fetch outcome into the cadence and return the next delay
    pub fn record(&mut self, result: BackgroundFetchResult) -> Duration {
        self.current = match result {
            BackgroundFetchResult::Failed => self.current.saturating_mul(2).min(self.max),
            BackgroundFetchResult::NoData | BackgroundFetchResult::NewData => self.base,
        };
        self.current
    }

    /// Fetch on the current cadence until `shutdown` flips to `true` or its
    /// sender is dropped.
    pub async fn run(
        mut self,
        orchestrator: StatusOrchestrator,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            "Background fetch active | Interval: {:?} | Max: {:?}",
            self.base, self.max
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.current) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let result = orchestrator.fetch_status().await;
            let next = self.record(result);
            debug!("Background fetch result {:?}, next in {:?}", result, next);
        }

        debug!("Background fetch stopped");
    }
}

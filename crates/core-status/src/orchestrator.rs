//! Status Orchestrator: single-flight status checks and re-check scheduling
//!
//! The orchestrator owns three pieces of state:
//! - a single-flight guard so only one status fetch is ever in flight
//! - at most one scheduled re-check, armed while the kill switch is engaged
//! - the presentation surface, which only the orchestrator may flip
//!
//! The single-flight guard stays claimed from the moment a trigger is
//! accepted until its reaction (surface transition, hooks, re-check
//! scheduling) has been applied, so checks never overlap and their reactions
//! land in the order the fetches were issued. Bookkeeping lives behind a
//! mutex that is never held across an `.await`. The only suspension point is
//! the delegate's fetch.
//!
//! # Example
//!
//! ```no_run
//! use statusgate_core_status::{
//!     FetchError, PresentationSurface, StatusDelegate, StatusObservable, StatusOrchestrator,
//! };
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! struct Endpoint;
//!
//! #[async_trait::async_trait]
//! impl StatusDelegate for Endpoint {
//!     async fn fetch_status(&self) -> Result<StatusObservable, FetchError> {
//!         Ok(StatusObservable::operational())
//!     }
//!
//!     fn on_force_update_required(&self) {
//!         println!("please upgrade");
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Overlay(AtomicBool);
//!
//! impl PresentationSurface for Overlay {
//!     fn is_engaged(&self) -> bool {
//!         self.0.load(Ordering::SeqCst)
//!     }
//!     fn engage(&self, _status: &StatusObservable) {
//!         self.0.store(true, Ordering::SeqCst);
//!     }
//!     fn disengage(&self) {
//!         self.0.store(false, Ordering::SeqCst);
//!     }
//! }
//!
//! # async fn example() {
//! let orchestrator = StatusOrchestrator::new(Arc::new(Endpoint));
//! orchestrator.set_presentation(Arc::new(Overlay::default()));
//!
//! // Interactive trigger, e.g. when the app returns to the foreground
//! orchestrator.check_status();
//!
//! // Background trigger reporting a three-way outcome to its scheduler
//! let result = orchestrator.fetch_status().await;
//! # let _ = result;
//! # }
//! ```

use crate::config::{FailurePolicy, SchedulerConfig};
use crate::decision::{decide, BackgroundFetchResult, CheckOutcome, Reaction};
use crate::delegate::{PresentationSurface, StatusDelegate};
use crate::error::ConfigError;
use crate::observable::StatusObservable;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Logical phase of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorPhase {
    /// No fetch in flight and the surface is hidden
    Idle,
    /// A status fetch is in flight
    Checking,
    /// No fetch in flight and the surface is shown
    Blocked,
}

/// Counters describing what the orchestrator has done so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    /// Status fetches handed to the delegate
    pub fetches_issued: u64,
    /// Triggers dropped because a fetch was already in flight
    pub dropped_triggers: u64,
    /// Fetches that produced no status
    pub fetch_failures: u64,
    /// Times the surface was shown
    pub engagements: u64,
    /// Times the surface was hidden
    pub disengagements: u64,
    /// Force-update reactions delivered to the delegate
    pub force_updates: u64,
    /// Re-checks armed
    pub rechecks_scheduled: u64,
}

/// An armed re-check. The id tells a firing timer whether it is still current.
struct ScheduledCheck {
    id: u64,
    delay: Duration,
    handle: JoinHandle<()>,
}

struct OrchestratorState {
    presentation: Option<Arc<dyn PresentationSurface>>,
    request_pending: bool,
    scheduled: Option<ScheduledCheck>,
    next_schedule_id: u64,
    stats: OrchestratorStats,
}

struct Inner {
    delegate: Arc<dyn StatusDelegate>,
    config: SchedulerConfig,
    state: Mutex<OrchestratorState>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(scheduled) = state.scheduled.take() {
            scheduled.handle.abort();
        }
    }
}

/// Clears the single-flight guard once a check has been fully applied, even
/// if the fetch panics or its task is aborted.
struct InFlight<'a> {
    inner: &'a Inner,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.inner.lock_state().request_pending = false;
    }
}

/// Drives status checks and the reactions they trigger.
///
/// Construct one per application and clone the handle wherever a trigger
/// lives; clones share all state.
///
/// Triggers spawn onto the ambient tokio runtime, so `check_status` and
/// `fetch_status` must be called from within one.
#[derive(Clone)]
pub struct StatusOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for StatusOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("StatusOrchestrator")
            .field("config", &self.inner.config)
            .field("has_presentation", &state.presentation.is_some())
            .field("request_pending", &state.request_pending)
            .field("scheduled", &state.scheduled.as_ref().map(|s| s.delay))
            .finish()
    }
}

impl StatusOrchestrator {
    /// Create an orchestrator with the default scheduler configuration
    pub fn new(delegate: Arc<dyn StatusDelegate>) -> Self {
        Self::from_parts(delegate, SchedulerConfig::default())
    }

    /// Create an orchestrator with a custom scheduler configuration
    pub fn with_config(
        delegate: Arc<dyn StatusDelegate>,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(delegate, config))
    }

    fn from_parts(delegate: Arc<dyn StatusDelegate>, config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                delegate,
                config,
                state: Mutex::new(OrchestratorState {
                    presentation: None,
                    request_pending: false,
                    scheduled: None,
                    next_schedule_id: 0,
                    stats: OrchestratorStats::default(),
                }),
            }),
        }
    }

    /// Hand the blocking surface to the orchestrator.
    ///
    /// Must happen before the first check.
    pub fn set_presentation(&self, surface: Arc<dyn PresentationSurface>) {
        self.inner.lock_state().presentation = Some(surface);
    }

    /// Trigger a status check and return immediately.
    ///
    /// Dropped silently when a check is already in flight.
    ///
    /// # Panics
    ///
    /// Panics if no presentation surface has been configured, or when called
    /// outside a tokio runtime.
    pub fn check_status(&self) {
        if let Some(surface) = self.begin_check() {
            self.spawn_check(surface);
        }
    }

    /// Run a status check for a background-fetch scheduler.
    ///
    /// The check itself runs on a spawned task, so dropping this future does
    /// not abandon the fetch or leave the single-flight guard set.
    ///
    /// # Panics
    ///
    /// Panics if no presentation surface has been configured.
    pub async fn fetch_status(&self) -> BackgroundFetchResult {
        let outcome = match self.begin_check() {
            Some(surface) => match self.spawn_check(surface).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Status check task did not complete: {}", e);
                    CheckOutcome::Failed
                }
            },
            None => CheckOutcome::AlreadyPending,
        };

        outcome.into()
    }

    /// The host application moved to the background.
    ///
    /// Cancels the scheduled re-check. An in-flight fetch is left alone and
    /// is still processed when it completes.
    pub fn enter_background(&self) {
        if self.cancel_scheduled() {
            debug!("Entered background: scheduled status re-check cancelled");
        }
    }

    /// Whether a status fetch is in flight
    pub fn is_request_pending(&self) -> bool {
        self.inner.lock_state().request_pending
    }

    /// Whether a re-check is armed
    pub fn has_scheduled_check(&self) -> bool {
        self.inner.lock_state().scheduled.is_some()
    }

    /// Delay of the armed re-check, if any
    pub fn scheduled_delay(&self) -> Option<Duration> {
        self.inner.lock_state().scheduled.as_ref().map(|s| s.delay)
    }

    /// Whether the presentation surface is currently shown
    pub fn is_blocked(&self) -> bool {
        self.presentation().is_some_and(|surface| surface.is_engaged())
    }

    /// Current logical phase
    pub fn phase(&self) -> OrchestratorPhase {
        if self.is_request_pending() {
            OrchestratorPhase::Checking
        } else if self.is_blocked() {
            OrchestratorPhase::Blocked
        } else {
            OrchestratorPhase::Idle
        }
    }

    /// Snapshot of the activity counters
    pub fn stats(&self) -> OrchestratorStats {
        self.inner.lock_state().stats.clone()
    }

    /// Scheduler configuration in use
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    fn presentation(&self) -> Option<Arc<dyn PresentationSurface>> {
        self.inner.lock_state().presentation.clone()
    }

    /// Claim the single-flight guard. Returns the surface to act on, or
    /// `None` when a fetch is already in flight.
    fn begin_check(&self) -> Option<Arc<dyn PresentationSurface>> {
        let mut state = self.inner.lock_state();

        let Some(surface) = state.presentation.clone() else {
            drop(state);
            panic!("presentation surface must be configured before checking status");
        };

        if state.request_pending {
            state.stats.dropped_triggers += 1;
            debug!("Status check already in flight, dropping trigger");
            return None;
        }

        state.request_pending = true;
        state.stats.fetches_issued += 1;
        if let Some(scheduled) = state.scheduled.take() {
            scheduled.handle.abort();
        }

        Some(surface)
    }

    fn spawn_check(&self, surface: Arc<dyn PresentationSurface>) -> JoinHandle<CheckOutcome> {
        let this = self.clone();
        tokio::spawn(async move { this.complete_check(surface).await })
    }

    async fn complete_check(&self, surface: Arc<dyn PresentationSurface>) -> CheckOutcome {
        // Held until the reaction is applied so a newer check cannot start
        // while this one is still flipping the surface.
        let _in_flight = InFlight { inner: &self.inner };
        let result = self.inner.delegate.fetch_status().await;

        if let Err(e) = &result {
            warn!("Status fetch failed: {}", e);
            self.inner.lock_state().stats.fetch_failures += 1;
        }

        let reaction = decide(&result, &self.inner.config);
        debug!("Status check reaction: {:?}", reaction);

        match &reaction {
            Reaction::Block { retry_after } => {
                if let Ok(status) = &result {
                    self.engage(surface.as_ref(), status);
                }
                self.schedule_recheck(*retry_after);
            }
            Reaction::ForceUpdate => self.force_update(),
            Reaction::Clear => self.disengage(surface.as_ref()),
            Reaction::FetchFailed => self.handle_failure(surface.as_ref()),
        }

        CheckOutcome::from(&reaction)
    }

    fn handle_failure(&self, surface: &dyn PresentationSurface) {
        match self.inner.config.failure_policy {
            FailurePolicy::Disengage => self.disengage(surface),
            FailurePolicy::KeepEngaged => {
                if surface.is_engaged() {
                    self.schedule_recheck(self.inner.config.fallback_retry_interval);
                }
            }
        }
    }

    fn force_update(&self) {
        info!("Client version rejected, forcing update");
        self.inner.lock_state().stats.force_updates += 1;
        self.inner.delegate.on_force_update_required();
    }

    fn engage(&self, surface: &dyn PresentationSurface, status: &StatusObservable) {
        if surface.is_engaged() {
            return;
        }

        info!("Kill switch engaged, blocking usage");
        self.inner.delegate.on_about_to_engage();
        surface.engage(status);
        self.inner.lock_state().stats.engagements += 1;
    }

    fn disengage(&self, surface: &dyn PresentationSurface) {
        if !surface.is_engaged() {
            return;
        }

        info!("Kill switch cleared, resuming normal operation");
        self.inner.delegate.on_about_to_disengage();
        surface.disengage();
        self.inner.lock_state().stats.disengagements += 1;
    }

    /// Arm a re-check unless one is already armed
    fn schedule_recheck(&self, delay: Duration) {
        let mut state = self.inner.lock_state();
        if state.scheduled.is_some() {
            debug!("Re-check already scheduled, keeping it");
            return;
        }

        let id = state.next_schedule_id;
        state.next_schedule_id += 1;

        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire_scheduled(weak, id);
        });

        state.scheduled = Some(ScheduledCheck { id, delay, handle });
        state.stats.rechecks_scheduled += 1;
        debug!("Status re-check scheduled in {:?}", delay);
    }

    /// Abort the armed re-check. Returns whether one was armed.
    fn cancel_scheduled(&self) -> bool {
        match self.inner.lock_state().scheduled.take() {
            Some(scheduled) => {
                scheduled.handle.abort();
                true
            }
            None => false,
        }
    }
}

fn fire_scheduled(inner: Weak<Inner>, id: u64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    {
        let mut state = inner.lock_state();
        match &state.scheduled {
            Some(scheduled) if scheduled.id == id => state.scheduled = None,
            _ => return,
        }
    }

    debug!("Scheduled status re-check firing");
    StatusOrchestrator { inner }.check_status();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FixedDelegate {
        status: Mutex<Result<StatusObservable, FetchError>>,
        fetches: AtomicUsize,
        force_updates: AtomicUsize,
    }

    impl FixedDelegate {
        fn new(status: Result<StatusObservable, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                status: Mutex::new(status),
                fetches: AtomicUsize::new(0),
                force_updates: AtomicUsize::new(0),
            })
        }

        fn set(&self, status: Result<StatusObservable, FetchError>) {
            *self.status.lock().unwrap() = status;
        }
    }

    #[async_trait]
    impl StatusDelegate for FixedDelegate {
        async fn fetch_status(&self) -> Result<StatusObservable, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.status.lock().unwrap().clone()
        }

        fn on_force_update_required(&self) {
            self.force_updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct Flag(AtomicBool);

    impl PresentationSurface for Flag {
        fn is_engaged(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
        fn engage(&self, _status: &StatusObservable) {
            self.0.store(true, Ordering::SeqCst);
        }
        fn disengage(&self) {
            self.0.store(false, Ordering::SeqCst);
        }
    }

    fn orchestrator(delegate: Arc<FixedDelegate>) -> StatusOrchestrator {
        let orchestrator = StatusOrchestrator::new(delegate);
        orchestrator.set_presentation(Arc::new(Flag::default()));
        orchestrator
    }

    #[tokio::test]
    async fn test_blocked_then_cleared() {
        let delegate = FixedDelegate::new(Ok(StatusObservable::blocked(30.0)));
        let orchestrator = orchestrator(delegate.clone());

        assert_eq!(orchestrator.fetch_status().await, BackgroundFetchResult::NoData);
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Blocked);
        assert_eq!(orchestrator.scheduled_delay(), Some(Duration::from_secs(30)));

        delegate.set(Ok(StatusObservable::operational()));
        assert_eq!(orchestrator.fetch_status().await, BackgroundFetchResult::NewData);
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Idle);
        assert!(!orchestrator.has_scheduled_check());

        let stats = orchestrator.stats();
        assert_eq!(stats.fetches_issued, 2);
        assert_eq!(stats.engagements, 1);
        assert_eq!(stats.disengagements, 1);
    }

    #[tokio::test]
    async fn test_force_update_reported_as_no_data() {
        let delegate = FixedDelegate::new(Ok(StatusObservable::upgrade_required()));
        let orchestrator = orchestrator(delegate.clone());

        assert_eq!(orchestrator.fetch_status().await, BackgroundFetchResult::NoData);
        assert_eq!(delegate.force_updates.load(Ordering::SeqCst), 1);
        assert!(!orchestrator.is_blocked());
    }

    #[tokio::test]
    async fn test_failure_reported_as_failed() {
        let delegate = FixedDelegate::new(Err(FetchError::Unavailable("offline".to_string())));
        let orchestrator = orchestrator(delegate.clone());

        assert_eq!(orchestrator.fetch_status().await, BackgroundFetchResult::Failed);
        assert_eq!(orchestrator.stats().fetch_failures, 1);
        assert!(!orchestrator.is_request_pending());
    }

    #[tokio::test]
    async fn test_keep_engaged_policy_reschedules_on_failure() {
        let delegate = FixedDelegate::new(Ok(StatusObservable::blocked(60.0)));
        let config = SchedulerConfig {
            failure_policy: FailurePolicy::KeepEngaged,
            ..Default::default()
        };
        let orchestrator = StatusOrchestrator::with_config(delegate.clone(), config).unwrap();
        orchestrator.set_presentation(Arc::new(Flag::default()));

        orchestrator.fetch_status().await;
        assert!(orchestrator.is_blocked());

        delegate.set(Err(FetchError::Transport("reset".to_string())));
        assert_eq!(orchestrator.fetch_status().await, BackgroundFetchResult::Failed);

        assert!(orchestrator.is_blocked());
        assert_eq!(orchestrator.scheduled_delay(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let delegate = FixedDelegate::new(Ok(StatusObservable::operational()));
        let config = SchedulerConfig {
            min_retry_interval: Duration::ZERO,
            ..Default::default()
        };

        assert!(StatusOrchestrator::with_config(delegate, config).is_err());
    }

    #[tokio::test]
    #[should_panic(expected = "presentation surface must be configured")]
    async fn test_check_without_presentation_panics() {
        let delegate = FixedDelegate::new(Ok(StatusObservable::operational()));
        let orchestrator = StatusOrchestrator::new(delegate);

        orchestrator.check_status();
    }
}

//! Shared fixtures: a scripted status delegate and a recording surface that
//! log every call into one ordered event list.

#![allow(dead_code)]

use async_trait::async_trait;
use statusgate_core_status::{
    FetchError, PresentationSurface, StatusDelegate, StatusObservable, StatusOrchestrator,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Fetch,
    ForceUpdate,
    AboutToEngage,
    AboutToDisengage,
    Engage(Option<String>),
    Disengage,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub struct ScriptedDelegate {
    status: Mutex<Result<StatusObservable, FetchError>>,
    gate: Semaphore,
    gated: AtomicBool,
    events: EventLog,
}

impl ScriptedDelegate {
    pub fn new(status: Result<StatusObservable, FetchError>, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(status),
            gate: Semaphore::new(0),
            gated: AtomicBool::new(false),
            events,
        })
    }

    /// Status returned by subsequent fetches
    pub fn set(&self, status: Result<StatusObservable, FetchError>) {
        *self.status.lock().unwrap() = status;
    }

    /// Hold fetches until `release` is called
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Let one held fetch complete
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl StatusDelegate for ScriptedDelegate {
    async fn fetch_status(&self) -> Result<StatusObservable, FetchError> {
        self.events.lock().unwrap().push(Event::Fetch);
        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.unwrap().forget();
        }
        self.status.lock().unwrap().clone()
    }

    fn on_force_update_required(&self) {
        self.events.lock().unwrap().push(Event::ForceUpdate);
    }

    fn on_about_to_engage(&self) {
        self.events.lock().unwrap().push(Event::AboutToEngage);
    }

    fn on_about_to_disengage(&self) {
        self.events.lock().unwrap().push(Event::AboutToDisengage);
    }
}

/// Delegate that only implements the required methods
pub struct MinimalDelegate {
    pub status: Mutex<Result<StatusObservable, FetchError>>,
}

#[async_trait]
impl StatusDelegate for MinimalDelegate {
    async fn fetch_status(&self) -> Result<StatusObservable, FetchError> {
        self.status.lock().unwrap().clone()
    }

    fn on_force_update_required(&self) {}
}

pub struct RecordingSurface {
    engaged: AtomicBool,
    events: EventLog,
}

impl RecordingSurface {
    pub fn new(events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            engaged: AtomicBool::new(false),
            events,
        })
    }
}

impl PresentationSurface for RecordingSurface {
    fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    fn engage(&self, status: &StatusObservable) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Engage(status.user_message.clone()));
        self.engaged.store(true, Ordering::SeqCst);
    }

    fn disengage(&self) {
        self.events.lock().unwrap().push(Event::Disengage);
        self.engaged.store(false, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub orchestrator: StatusOrchestrator,
    pub delegate: Arc<ScriptedDelegate>,
    pub events: EventLog,
}

impl Harness {
    pub fn new(status: Result<StatusObservable, FetchError>) -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let delegate = ScriptedDelegate::new(status, events.clone());
        let orchestrator = StatusOrchestrator::new(delegate.clone());
        orchestrator.set_presentation(RecordingSurface::new(events.clone()));

        Self {
            orchestrator,
            delegate,
            events,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }
}

/// Give spawned tasks a chance to run to their next suspension point
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

//! StatusGate Core: remote kill switch and forced-upgrade orchestration
//!
//! # Overview
//!
//! A client application asks a remote service for its availability status and
//! reacts to it:
//!
//! - **Blocked**: the kill switch is engaged, a blocking surface is shown and
//!   the status is re-checked on a schedule the status itself suggests
//! - **Force update**: the client version is rejected, the application is told
//!   to upgrade
//! - **Operational**: any active block is lifted
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of:
//! - How status is transported (HTTP, files, push channels)
//! - How the blocking surface is drawn
//! - Host lifecycle plumbing (foreground/background signals, background fetch)
//!
//! Those concerns are supplied by the embedding application through the
//! [`StatusDelegate`] and [`PresentationSurface`] traits.
//!
//! # Architecture
//!
//! ```text
//!   check_status() / fetch_status() / scheduled re-check
//!               │
//!               ▼
//! ┌─────────────────────────────────────────┐
//! │       Single-flight guard               │  ← drop overlapping triggers
//! └─────────────┬───────────────────────────┘
//!               │
//!               ▼
//!       StatusDelegate::fetch_status
//!               │
//!               ▼
//! ┌─────────────────────────────────────────┐
//! │       decide()                          │  ← Block | ForceUpdate | Clear | FetchFailed
//! └─────────────┬───────────────────────────┘
//!               │
//!               ▼
//!   engage / disengage surface, force update, arm re-check
//! ```

pub mod config;
pub mod decision;
pub mod delegate;
pub mod error;
pub mod observable;
pub mod orchestrator;

// Re-export main types for convenience
pub use config::{FailurePolicy, SchedulerConfig};
pub use decision::{decide, BackgroundFetchResult, CheckOutcome, Reaction};
pub use delegate::{PresentationSurface, StatusDelegate};
pub use error::{ConfigError, FetchError};
pub use observable::StatusObservable;
pub use orchestrator::{OrchestratorPhase, OrchestratorStats, StatusOrchestrator};

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use statusgate_core_status::prelude::*;
/// ```
pub mod prelude {
    pub use super::config::{FailurePolicy, SchedulerConfig};
    pub use super::decision::BackgroundFetchResult;
    pub use super::delegate::{PresentationSurface, StatusDelegate};
    pub use super::error::FetchError;
    pub use super::observable::StatusObservable;
    pub use super::orchestrator::StatusOrchestrator;
}

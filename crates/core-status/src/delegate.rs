//! Collaborator traits consumed by the orchestrator
//!
//! The orchestrator knows nothing about how status is fetched or how the
//! blocking surface is drawn. Both are supplied by the embedding application
//! through these traits.

use crate::error::FetchError;
use crate::observable::StatusObservable;
use async_trait::async_trait;

/// Source of status plus the reactions the application must implement.
///
/// `on_about_to_engage` and `on_about_to_disengage` are best-effort hooks for
/// running a transition animation. Implementors that don't care can leave the
/// default no-ops in place.
#[async_trait]
pub trait StatusDelegate: Send + Sync {
    /// Fetch the current status.
    ///
    /// Resolves exactly once per call with either a status or an error.
    /// Timeouts are the implementor's concern.
    async fn fetch_status(&self) -> Result<StatusObservable, FetchError>;

    /// The client must upgrade before continuing
    fn on_force_update_required(&self);

    /// Called before the blocking surface is shown
    fn on_about_to_engage(&self) {}

    /// Called before the blocking surface is hidden
    fn on_about_to_disengage(&self) {}
}

/// The blocking overlay.
///
/// Once handed to the orchestrator, nothing else should flip its visibility.
pub trait PresentationSurface: Send + Sync {
    /// Whether the surface is currently shown
    fn is_engaged(&self) -> bool;

    /// Show the surface for the given status.
    ///
    /// Only called on the hidden-to-shown transition. A block that continues
    /// across re-checks does not call it again, so a changed `user_message`
    /// is not delivered until the surface has been hidden once.
    fn engage(&self, status: &StatusObservable);

    /// Hide the surface
    fn disengage(&self);
}

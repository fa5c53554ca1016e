/*!
 * File-backed status source
 *
 * Reads a JSON status document from disk on every fetch. Whatever process
 * maintains the file (a deploy hook, a sidecar polling the real endpoint, an
 * operator) acts as the remote kill switch.
 */

use async_trait::async_trait;
use statusgate_core_status::{FetchError, StatusDelegate, StatusObservable};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Status delegate reading `StatusObservable` JSON from a file
#[derive(Debug)]
pub struct FileStatusSource {
    path: PathBuf,
    force_updates: AtomicU64,
}

impl FileStatusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            force_updates: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of force-update reactions received so far
    pub fn force_updates(&self) -> u64 {
        self.force_updates.load(Ordering::SeqCst)
    }

    /// Whether an upgrade has been demanded at least once
    pub fn update_required(&self) -> bool {
        self.force_updates() > 0
    }
}

#[async_trait]
impl StatusDelegate for FileStatusSource {
    async fn fetch_status(&self) -> Result<StatusObservable, FetchError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    FetchError::Unavailable(format!("{} does not exist", self.path.display()))
                }
                _ => FetchError::Transport(format!("{}: {}", self.path.display(), e)),
            })?;

        let status: StatusObservable = serde_json::from_str(&contents)
            .map_err(|e| FetchError::InvalidPayload(format!("{}: {}", self.path.display(), e)))?;

        debug!(
            "Read status from {}: api_inactive={} force_update={}",
            self.path.display(),
            status.api_inactive(),
            status.force_update()
        );
        Ok(status)
    }

    fn on_force_update_required(&self) {
        self.force_updates.fetch_add(1, Ordering::SeqCst);
        warn!("This client version is no longer supported; an update is required");
    }

    fn on_about_to_engage(&self) {
        debug!("Kill switch about to engage");
    }

    fn on_about_to_disengage(&self) {
        debug!("Kill switch about to disengage");
    }
}

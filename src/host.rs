/*!
 * Composition root: wires the file source, console overlay and orchestrator
 */

use statusgate_core_status::{BackgroundFetchResult, StatusOrchestrator};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::background::BackgroundFetcher;
use crate::config::StatusGateConfig;
use crate::error::Result;
use crate::overlay::ConsoleOverlay;
use crate::source::FileStatusSource;

/// The assembled application: one orchestrator for the process lifetime
pub struct StatusGate {
    orchestrator: StatusOrchestrator,
    source: Arc<FileStatusSource>,
    overlay: Arc<ConsoleOverlay>,
    fetcher: BackgroundFetcher,
}

impl StatusGate {
    /// Build the host from configuration.
    ///
    /// The overlay is configured before the orchestrator is handed out, so
    /// every trigger path sees a presentation surface.
    pub fn new(config: &StatusGateConfig, overlay: ConsoleOverlay) -> Result<Self> {
        config.validate()?;

        let source = Arc::new(FileStatusSource::new(&config.status_file));
        let overlay = Arc::new(overlay);

        let orchestrator = StatusOrchestrator::with_config(source.clone(), config.scheduler.clone())?;
        orchestrator.set_presentation(overlay.clone());

        Ok(Self {
            orchestrator,
            source,
            overlay,
            fetcher: BackgroundFetcher::from_config(config),
        })
    }

    pub fn orchestrator(&self) -> &StatusOrchestrator {
        &self.orchestrator
    }

    pub fn source(&self) -> &FileStatusSource {
        &self.source
    }

    pub fn overlay(&self) -> &ConsoleOverlay {
        &self.overlay
    }

    /// Run a single background-style check and stop any re-check it armed
    pub async fn check_once(&self) -> BackgroundFetchResult {
        let result = self.orchestrator.fetch_status().await;
        self.orchestrator.enter_background();
        result
    }

    /// Check immediately, then keep fetching in the background until
    /// `shutdown` flips. Re-checks are cancelled on the way out.
    pub async fn watch(&self, shutdown: watch::Receiver<bool>) {
        info!("Watching {}", self.source.path().display());

        self.orchestrator.check_status();
        self.fetcher
            .clone()
            .run(self.orchestrator.clone(), shutdown)
            .await;

        self.orchestrator.enter_background();
        info!("Stopped watching {}", self.source.path().display());
    }
}

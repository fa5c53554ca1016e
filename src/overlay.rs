/*!
 * Console presentation surface
 */

use console::{style, Term};
use statusgate_core_status::{PresentationSurface, StatusObservable};
use std::sync::atomic::{AtomicBool, Ordering};

const DEFAULT_BLOCK_MESSAGE: &str = "This service is temporarily unavailable.";

/// Blocking surface rendered as a banner on stderr
#[derive(Debug)]
pub struct ConsoleOverlay {
    engaged: AtomicBool,
    quiet: bool,
}

impl Default for ConsoleOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleOverlay {
    pub fn new() -> Self {
        Self {
            engaged: AtomicBool::new(false),
            quiet: false,
        }
    }

    /// Overlay that tracks state without printing anything
    pub fn quiet() -> Self {
        Self {
            engaged: AtomicBool::new(false),
            quiet: true,
        }
    }

    fn print(&self, line: String) {
        if self.quiet {
            return;
        }
        // A closed stderr leaves nothing useful to report to
        let _ = Term::stderr().write_line(&line);
    }
}

/// Text shown while the kill switch is engaged
pub fn block_message(status: &StatusObservable) -> &str {
    status
        .user_message()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(DEFAULT_BLOCK_MESSAGE)
}

impl PresentationSurface for ConsoleOverlay {
    fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    fn engage(&self, status: &StatusObservable) {
        self.engaged.store(true, Ordering::SeqCst);
        self.print(format!(
            "{} {}",
            style("⛔ BLOCKED").red().bold(),
            block_message(status)
        ));
    }

    fn disengage(&self) {
        self.engaged.store(false, Ordering::SeqCst);
        self.print(format!(
            "{} Service available again.",
            style("✅ RESUMED").green().bold()
        ));
    }
}

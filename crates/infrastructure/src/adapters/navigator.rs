//! In-process navigator for headless hosts.

use parking_lot::Mutex;
use sessiongate_application::ports::Navigator;
use tracing::debug;

/// Tracks the current path and records every redirect.
///
/// Used by the CLI and tests, where there is no real router to drive.
#[derive(Debug)]
pub struct InMemoryNavigator {
    current: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl InMemoryNavigator {
    /// Creates a navigator positioned at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Moves to `path` as a user-driven navigation (not recorded as a redirect).
    pub fn navigate(&self, path: impl Into<String>) {
        *self.current.lock() = path.into();
    }

    /// Redirect targets in the order they were issued.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Default for InMemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for InMemoryNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn redirect_to(&self, path: &str) {
        debug!(to = path, "redirect");
        self.redirects.lock().push(path.to_string());
        *self.current.lock() = path.to_string();
    }
}

//! Navigation port

/// Access to the current location and an imperative full redirect.
pub trait Navigator: Send + Sync {
    /// The current navigable path, e.g. `/editor`.
    fn current_path(&self) -> String;

    /// Replaces the current location with `path`.
    fn redirect_to(&self, path: &str);
}

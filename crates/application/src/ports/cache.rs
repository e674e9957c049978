//! Derived data cache port

/// A cache whose contents are only valid for the session that filled it.
pub trait DerivedDataCache: Send + Sync {
    /// Drops every cached entry.
    fn clear(&self);
}

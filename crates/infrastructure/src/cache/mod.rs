//! Derived-data cache for GET responses.

use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;
use sessiongate_application::ports::DerivedDataCache;
use tracing::debug;

/// Default number of cached responses.
pub const DEFAULT_CAPACITY: u64 = 1_000;

/// TTL-bounded cache of decoded GET bodies keyed by request path and the
/// credentials the request carried.
///
/// A body fetched anonymously is never served to an authenticated request,
/// nor one fetched under another token. The whole cache is dropped whenever
/// the session is invalidated.
#[derive(Clone)]
pub struct MokaResponseCache {
    inner: Cache<(String, Option<String>), Value>,
}

impl MokaResponseCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// Creates a cache with an explicit entry limit.
    #[must_use]
    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Cached body for `path` fetched with `credentials`.
    #[must_use]
    pub fn get(&self, path: &str, credentials: Option<&str>) -> Option<Value> {
        self.inner
            .get(&(path.to_string(), credentials.map(str::to_string)))
    }

    /// Stores the body for `path` fetched with `credentials`.
    pub fn insert(&self, path: impl Into<String>, credentials: Option<&str>, body: Value) {
        self.inner
            .insert((path.into(), credentials.map(str::to_string)), body);
    }

    /// Number of live entries (after pending maintenance).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DerivedDataCache for MokaResponseCache {
    fn clear(&self) {
        debug!("dropping cached responses");
        self.inner.invalidate_all();
    }
}

impl std::fmt::Debug for MokaResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaResponseCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

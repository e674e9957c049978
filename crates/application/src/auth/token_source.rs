//! Ranked token lookup.
//!
//! "The current token" is resolved by trying sources in rank order: the
//! in-memory store first, then a direct read of the persisted snapshot for
//! the window before the store has rehydrated. Once the store is
//! bootstrapped it is authoritative and the snapshot is no longer read, so
//! a cleared session cannot come back from a snapshot not yet rewritten.
//! Every source is read-only.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::token_store::{TokenStore, decode_snapshot};
use crate::ApplicationResult;
use crate::ports::SnapshotStorage;

/// A capability that may yield the current bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the token, `Ok(None)` when this source has none.
    ///
    /// # Errors
    ///
    /// Returns an error when the source itself could not be read.
    async fn token(&self) -> ApplicationResult<Option<String>>;
}

/// Reads the token from the in-memory store.
#[derive(Debug, Clone)]
pub struct StoreTokenSource {
    store: TokenStore,
}

impl StoreTokenSource {
    /// Creates a source over `store`.
    #[must_use]
    pub const fn new(store: TokenStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenSource for StoreTokenSource {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn token(&self) -> ApplicationResult<Option<String>> {
        Ok(self.store.token())
    }
}

/// Parses the persisted snapshot directly, bypassing the store.
pub struct SnapshotTokenSource {
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    until_bootstrapped: Option<TokenStore>,
}

impl SnapshotTokenSource {
    /// Creates a source reading `key` from `storage`.
    pub fn new(storage: Arc<dyn SnapshotStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            until_bootstrapped: None,
        }
    }

    /// Creates a source reading the snapshot `store` persists to, for as
    /// long as `store` has not rehydrated.
    #[must_use]
    pub fn for_store(store: &TokenStore) -> Self {
        Self {
            until_bootstrapped: Some(store.clone()),
            ..Self::new(store.storage(), store.key())
        }
    }
}

#[async_trait]
impl TokenSource for SnapshotTokenSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn token(&self) -> ApplicationResult<Option<String>> {
        if self
            .until_bootstrapped
            .as_ref()
            .is_some_and(TokenStore::is_bootstrapped)
        {
            return Ok(None);
        }
        let Some(raw) = self.storage.read(&self.key).await? else {
            return Ok(None);
        };
        // A corrupt snapshot counts as "no token", not as a source failure.
        Ok(decode_snapshot(&self.key, &raw).and_then(|snapshot| snapshot.token().map(str::to_string)))
    }
}

/// Tries each source in rank order and returns the first token found.
///
/// Source errors are logged and treated as "no token"; resolution itself
/// never fails.
#[derive(Clone, Default)]
pub struct FallbackTokenSource {
    sources: Vec<Arc<dyn TokenSource>>,
}

impl FallbackTokenSource {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lower-ranked source.
    #[must_use]
    pub fn then(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// The standard chain: store first, snapshot second.
    #[must_use]
    pub fn for_store(store: &TokenStore) -> Self {
        Self::new()
            .then(Arc::new(StoreTokenSource::new(store.clone())))
            .then(Arc::new(SnapshotTokenSource::for_store(store)))
    }

    /// Source names in rank order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Resolves the token.
    pub async fn resolve(&self) -> Option<String> {
        for source in &self.sources {
            match source.token().await {
                Ok(Some(token)) if !token.trim().is_empty() => {
                    debug!(source = source.name(), "token resolved");
                    return Some(token);
                }
                Ok(_) => {}
                Err(e) => warn!(source = source.name(), error = %e, "token source failed"),
            }
        }
        None
    }
}

#[async_trait]
impl TokenSource for FallbackTokenSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn token(&self) -> ApplicationResult<Option<String>> {
        Ok(self.resolve().await)
    }
}

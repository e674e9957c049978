//! Logout use case.

use std::sync::Arc;

use sessiongate_domain::Session;

use crate::auth::TokenStore;
use crate::ports::DerivedDataCache;

/// Use case for an explicit sign-out.
pub struct Logout {
    store: TokenStore,
    cache: Arc<dyn DerivedDataCache>,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub fn new(store: TokenStore, cache: Arc<dyn DerivedDataCache>) -> Self {
        Self { store, cache }
    }

    /// Clears the session and drops derived data. Returns the session that
    /// was signed out, if any.
    pub fn execute(&self) -> Option<Session> {
        let previous = self.store.clear();
        self.cache.clear();
        previous
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{CountingCache, bootstrapped_store, session};

    #[tokio::test]
    async fn logout_clears_session_and_cache() {
        let (store, _storage) = bootstrapped_store().await;
        store.set(session("t1", "alice"));
        let cache = Arc::new(CountingCache::default());

        let previous = Logout::new(store.clone(), cache.clone()).execute();

        assert_eq!(previous.unwrap().username(), "alice");
        assert!(store.get().is_none());
        assert_eq!(cache.count(), 1);
    }
}

//! Reclassification of error responses into session invalidation.

use std::sync::Arc;

use sessiongate_domain::{Classification, LOGIN_PATH, PublicPaths, classify};
use tracing::{debug, info};

use super::token_store::TokenStore;
use crate::ports::{DerivedDataCache, Navigator};

/// What an invalidation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// No session was held; nothing changed.
    NoSession,
    /// The session was cleared; the current path is public so no redirect.
    Cleared,
    /// The session was cleared and a redirect was issued.
    Redirected {
        /// Redirect target.
        to: String,
    },
}

impl Invalidation {
    /// Returns true if a session was actually cleared.
    #[must_use]
    pub const fn cleared(&self) -> bool {
        !matches!(self, Self::NoSession)
    }
}

/// Drops the session and everything derived from it.
pub struct SessionInvalidator {
    store: TokenStore,
    cache: Arc<dyn DerivedDataCache>,
    navigator: Arc<dyn Navigator>,
    public_paths: PublicPaths,
    login_path: String,
}

impl SessionInvalidator {
    /// Creates an invalidator with the default allowlist and login path.
    pub fn new(
        store: TokenStore,
        cache: Arc<dyn DerivedDataCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            cache,
            navigator,
            public_paths: PublicPaths::default(),
            login_path: LOGIN_PATH.to_string(),
        }
    }

    /// Overrides the public-path allowlist.
    #[must_use]
    pub fn with_public_paths(mut self, public_paths: PublicPaths) -> Self {
        self.public_paths = public_paths;
        self
    }

    /// Overrides the login redirect target.
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Clears the session if one is held, drops derived data, and redirects
    /// to login unless the current path is public. Without a session this
    /// is a no-op, so repeated failures after logout never redirect again.
    pub fn invalidate(&self) -> Invalidation {
        let Some(previous) = self.store.clear() else {
            debug!("auth failure without a session; nothing to invalidate");
            return Invalidation::NoSession;
        };

        self.cache.clear();

        let current = self.navigator.current_path();
        if self.public_paths.is_public(&current) {
            info!(username = previous.username(), path = %current, "session invalidated");
            return Invalidation::Cleared;
        }

        info!(
            username = previous.username(),
            from = %current,
            to = %self.login_path,
            "session invalidated; redirecting to login"
        );
        self.navigator.redirect_to(&self.login_path);
        Invalidation::Redirected {
            to: self.login_path.clone(),
        }
    }
}

/// Outcome of handling one error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOutcome {
    /// Rule-table verdict.
    pub classification: Classification,
    /// Present when the verdict triggered an invalidation attempt.
    pub invalidation: Option<Invalidation>,
}

/// Applies the auth-failure rule table to error responses.
pub struct ResponseClassifier {
    invalidator: Arc<SessionInvalidator>,
}

impl ResponseClassifier {
    /// Creates a classifier that invalidates through `invalidator`.
    #[must_use]
    pub fn new(invalidator: impl Into<Arc<SessionInvalidator>>) -> Self {
        Self {
            invalidator: invalidator.into(),
        }
    }

    /// Classifies the response and invalidates the session on an auth
    /// failure. Runs once per response and never retries the request.
    pub fn handle(&self, status: u16, request_url: &str) -> ClassifierOutcome {
        let classification = classify(status, request_url);
        let invalidation = classification.is_auth_failure.then(|| {
            debug!(status, url = request_url, "auth failure response");
            self.invalidator.invalidate()
        });
        ClassifierOutcome {
            classification,
            invalidation,
        }
    }

    /// The underlying invalidator.
    #[must_use]
    pub const fn invalidator(&self) -> &Arc<SessionInvalidator> {
        &self.invalidator
    }
}

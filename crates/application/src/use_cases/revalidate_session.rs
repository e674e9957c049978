//! Startup session revalidation.
//!
//! Once the store is bootstrapped and holds a token, the current user is
//! fetched. A 401, 403 or 404 means the restored session is dead and it is
//! invalidated; any other failure is logged and the session kept. When the
//! request went through the session gate, the gate has usually invalidated
//! already and the result is [`Invalidation::NoSession`].

use std::sync::Arc;

use sessiongate_domain::Session;
use tracing::{debug, warn};

use crate::auth::{Invalidation, SessionInvalidator, TokenStore};
use crate::ports::AuthGateway;

/// Result of a revalidation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation {
    /// Not bootstrapped yet, or no token held.
    Skipped,
    /// The server confirmed the session; display fields were refreshed.
    Refreshed(Session),
    /// The server rejected the session.
    Invalidated(Invalidation),
    /// The check failed for a reason unrelated to the session.
    Inconclusive,
}

/// Use case for confirming a rehydrated session with the server.
pub struct RevalidateSession {
    gateway: Arc<dyn AuthGateway>,
    store: TokenStore,
    invalidator: Arc<SessionInvalidator>,
}

impl RevalidateSession {
    /// Creates a new `RevalidateSession` use case.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: TokenStore,
        invalidator: Arc<SessionInvalidator>,
    ) -> Self {
        Self {
            gateway,
            store,
            invalidator,
        }
    }

    /// Runs the check. Never fails.
    pub async fn execute(&self) -> Revalidation {
        if !self.store.is_bootstrapped() || self.store.token().is_none() {
            return Revalidation::Skipped;
        }

        match self.gateway.current_user().await {
            Ok(session) => {
                debug!(username = session.username(), "session confirmed");
                self.store.set(session.clone());
                Revalidation::Refreshed(session)
            }
            Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => {
                Revalidation::Invalidated(self.invalidator.invalidate())
            }
            Err(e) => {
                warn!(error = %e, "could not revalidate session");
                Revalidation::Inconclusive
            }
        }
    }
}

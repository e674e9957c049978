//! Login use case.

use std::sync::Arc;

use sessiongate_domain::Session;

use crate::ApplicationResult;
use crate::auth::TokenStore;
use crate::ports::{AuthGateway, LoginCredentials};

/// Use case for exchanging credentials for a session.
pub struct Login {
    gateway: Arc<dyn AuthGateway>,
    store: TokenStore,
}

impl Login {
    /// Creates a new `Login` use case.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, store: TokenStore) -> Self {
        Self { gateway, store }
    }

    /// Logs in and installs the returned session.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged; validation messages are
    /// available through its normalized body.
    pub async fn execute(&self, credentials: &LoginCredentials) -> ApplicationResult<Session> {
        let session = self.gateway.login(credentials).await?;
        self.store.set(session.clone());
        Ok(session)
    }
}

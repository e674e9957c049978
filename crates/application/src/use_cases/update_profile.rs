//! Update profile use case.

use std::sync::Arc;

use sessiongate_domain::Session;

use crate::ApplicationResult;
use crate::auth::TokenStore;
use crate::ports::{AuthGateway, ProfileChanges};

/// Use case for editing the signed-in user's profile.
pub struct UpdateProfile {
    gateway: Arc<dyn AuthGateway>,
    store: TokenStore,
}

impl UpdateProfile {
    /// Creates a new `UpdateProfile` use case.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, store: TokenStore) -> Self {
        Self { gateway, store }
    }

    /// Sends the changes and replaces the session with the server's answer.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged. An auth failure will already
    /// have cleared the session through the transport hooks.
    pub async fn execute(&self, changes: &ProfileChanges) -> ApplicationResult<Session> {
        let session = self.gateway.update_user(changes).await?;
        self.store.set(session.clone());
        Ok(session)
    }
}

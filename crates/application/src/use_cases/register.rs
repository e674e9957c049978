//! Register use case.

use std::sync::Arc;

use sessiongate_domain::Session;

use crate::ApplicationResult;
use crate::auth::TokenStore;
use crate::ports::{AuthGateway, Registration};

/// Use case for creating an account and signing in with it.
pub struct Register {
    gateway: Arc<dyn AuthGateway>,
    store: TokenStore,
}

impl Register {
    /// Creates a new `Register` use case.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, store: TokenStore) -> Self {
        Self { gateway, store }
    }

    /// Registers and installs the returned session.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged.
    pub async fn execute(&self, registration: &Registration) -> ApplicationResult<Session> {
        let session = self.gateway.register(registration).await?;
        self.store.set(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, bootstrapped_store, session};

    #[tokio::test]
    async fn register_sets_session() {
        let (store, _storage) = bootstrapped_store().await;
        let gateway = Arc::new(FakeGateway::returning(Ok(session("t9", "carol"))));
        let register = Register::new(gateway, store.clone());

        register
            .execute(&Registration {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(store.get().unwrap().username(), "carol");
    }
}

//! Best-effort auto-login bootstrap.
//!
//! Runs once at startup when no session is held. Every failure is logged at
//! debug level and swallowed; it never blocks or fails startup.

use std::sync::Arc;

use tracing::debug;

use crate::auth::TokenStore;
use crate::ports::{AuthGateway, AutoLoginSource, LoginCredentials};

/// What the auto-login attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoLoginOutcome {
    /// A session already existed, so nothing was fetched.
    SessionPresent,
    /// The remote config is disabled or incomplete.
    Disabled,
    /// Logged in as the given user.
    LoggedIn {
        /// Username of the new session.
        username: String,
    },
    /// Fetching the config or logging in failed.
    Failed,
}

/// Use case for the one-shot auto-login.
pub struct AutoLogin {
    source: Arc<dyn AutoLoginSource>,
    gateway: Arc<dyn AuthGateway>,
    store: TokenStore,
}

impl AutoLogin {
    /// Creates a new `AutoLogin` use case.
    #[must_use]
    pub fn new(
        source: Arc<dyn AutoLoginSource>,
        gateway: Arc<dyn AuthGateway>,
        store: TokenStore,
    ) -> Self {
        Self {
            source,
            gateway,
            store,
        }
    }

    /// Attempts auto-login. Never fails.
    pub async fn execute(&self) -> AutoLoginOutcome {
        if self.store.has_session() {
            return AutoLoginOutcome::SessionPresent;
        }

        let config = match self.source.fetch().await {
            Ok(config) => config,
            Err(e) => {
                debug!(error = %e, "auto-login not configured or failed");
                return AutoLoginOutcome::Failed;
            }
        };

        if !config.is_usable() {
            debug!("auto-login disabled");
            return AutoLoginOutcome::Disabled;
        }

        let credentials = LoginCredentials::new(config.email, config.password);
        let session = match self.gateway.login(&credentials).await {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "auto-login not configured or failed");
                return AutoLoginOutcome::Failed;
            }
        };

        let username = session.username().to_string();
        self.store.set(session);

        if let Err(e) = self.source.reset().await {
            debug!(error = %e, "failed to reset auto-login config");
        }

        AutoLoginOutcome::LoggedIn { username }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::AutoLoginConfig;
    use crate::test_support::{
        FakeAutoLogin, FakeGateway, bootstrapped_store, session, status_error,
    };
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn logs_in_and_resets_config() {
        let (store, _storage) = bootstrapped_store().await;
        let source = Arc::new(FakeAutoLogin::enabled("demo@example.com", "demo1234"));
        let gateway = Arc::new(FakeGateway::returning(Ok(session("t1", "demo"))));

        let outcome = AutoLogin::new(source.clone(), gateway.clone(), store.clone())
            .execute()
            .await;

        assert_eq!(
            outcome,
            AutoLoginOutcome::LoggedIn {
                username: "demo".to_string()
            }
        );
        assert_eq!(store.token().as_deref(), Some("t1"));
        assert_eq!(source.resets.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.logins.lock()[0].password, "demo1234");
    }

    #[tokio::test]
    async fn skipped_when_session_exists() {
        let (store, _storage) = bootstrapped_store().await;
        store.set(session("t0", "alice"));
        let source = Arc::new(FakeAutoLogin::enabled("demo@example.com", "demo1234"));
        let gateway = Arc::new(FakeGateway::default());

        let outcome = AutoLogin::new(source.clone(), gateway, store.clone())
            .execute()
            .await;

        assert_eq!(outcome, AutoLoginOutcome::SessionPresent);
        assert_eq!(store.token().as_deref(), Some("t0"));
    }

    #[tokio::test]
    async fn disabled_config_does_nothing() {
        let (store, _storage) = bootstrapped_store().await;
        let source = Arc::new(FakeAutoLogin {
            config: Ok(AutoLoginConfig {
                auto_login: true,
                email: String::new(),
                password: "x".to_string(),
            }),
            fail_reset: false,
            resets: Default::default(),
        });

        let outcome = AutoLogin::new(source, Arc::new(FakeGateway::default()), store.clone())
            .execute()
            .await;

        assert_eq!(outcome, AutoLoginOutcome::Disabled);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let (store, _storage) = bootstrapped_store().await;

        let unreachable = AutoLogin::new(
            Arc::new(FakeAutoLogin::failing()),
            Arc::new(FakeGateway::default()),
            store.clone(),
        );
        assert_eq!(unreachable.execute().await, AutoLoginOutcome::Failed);

        let rejected = AutoLogin::new(
            Arc::new(FakeAutoLogin::enabled("demo@example.com", "bad")),
            Arc::new(FakeGateway::returning(Err(status_error(422, "/users/login")))),
            store.clone(),
        );
        assert_eq!(rejected.execute().await, AutoLoginOutcome::Failed);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn reset_failure_keeps_session() {
        let (store, _storage) = bootstrapped_store().await;
        let mut source = FakeAutoLogin::enabled("demo@example.com", "demo1234");
        source.fail_reset = true;

        let outcome = AutoLogin::new(
            Arc::new(source),
            Arc::new(FakeGateway::returning(Ok(session("t1", "demo")))),
            store.clone(),
        )
        .execute()
        .await;

        assert!(matches!(outcome, AutoLoginOutcome::LoggedIn { .. }));
        assert!(store.has_session());
    }
}

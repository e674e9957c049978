//! Startup wiring and the bootstrap sequence.
//!
//! Every entry point goes through [`Runtime::bootstrap`]:
//! rehydrate the store, arm the gate, best-effort auto-login, then
//! revalidate whatever session survived.

use std::sync::Arc;

use sessiongate_application::ports::SnapshotStorage;
use sessiongate_application::{
    ApplicationError, ApplicationResult, AutoLogin, AutoLoginOutcome, RevalidateSession,
    Revalidation, SessionGate, SessionInvalidator, TokenStore,
};
use sessiongate_infrastructure::{
    FileSnapshotStorage, GateConfig, HttpAuthGateway, HttpAutoLoginSource, InMemoryNavigator,
    MokaResponseCache, ReqwestTransport, SystemClock,
};
use tracing::{debug, info, warn};

/// What the bootstrap sequence did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Rehydration finished within the configured bound.
    pub rehydrated: bool,
    /// `None` when auto-login is not configured or rehydration had not
    /// finished, so no restored session could be ruled out.
    pub auto_login: Option<AutoLoginOutcome>,
    /// Result of confirming the session with the server.
    pub revalidation: Revalidation,
}

/// The wired-up gate and its collaborators.
pub struct Runtime {
    /// Loaded configuration.
    pub config: GateConfig,
    /// Session store.
    pub store: TokenStore,
    /// The gate registered on the transport.
    pub gate: Arc<SessionGate>,
    /// API transport.
    pub transport: Arc<ReqwestTransport>,
    /// User endpoints.
    pub gateway: Arc<HttpAuthGateway>,
    /// Derived-data cache cleared on invalidation.
    pub cache: MokaResponseCache,
    /// Headless navigator.
    pub navigator: Arc<InMemoryNavigator>,
    /// Bootstrap outcome.
    pub report: BootstrapReport,
}

impl Runtime {
    /// Builds the runtime with file-backed snapshot storage.
    ///
    /// # Errors
    ///
    /// Fails when there is no usable snapshot directory or the
    /// configuration is invalid.
    pub async fn bootstrap_with_files(
        config: GateConfig,
        navigator: Arc<InMemoryNavigator>,
    ) -> ApplicationResult<Self> {
        let storage = match config.resolved_snapshot_dir() {
            Some(dir) => FileSnapshotStorage::new(dir),
            None => FileSnapshotStorage::in_config_dir()?,
        };
        debug!(dir = %storage.dir().display(), "using file snapshot storage");
        Self::bootstrap(config, Arc::new(storage), navigator).await
    }

    /// Builds the runtime over `storage` and runs the bootstrap sequence.
    ///
    /// # Errors
    ///
    /// Fails only on invalid configuration. Rehydration, auto-login and
    /// revalidation problems are logged and reflected in the report.
    pub async fn bootstrap(
        config: GateConfig,
        storage: Arc<dyn SnapshotStorage>,
        navigator: Arc<InMemoryNavigator>,
    ) -> ApplicationResult<Self> {
        config
            .validate()
            .map_err(|e| ApplicationError::Config(e.to_string()))?;

        let store = TokenStore::with_key(storage, Arc::new(SystemClock::new()), &config.snapshot_key);
        let cache = MokaResponseCache::new(config.cache_ttl());

        let invalidator = SessionInvalidator::new(store.clone(), Arc::new(cache.clone()), navigator.clone())
            .with_public_paths(config.public_paths())
            .with_login_path(&config.login_path);
        let gate = Arc::new(SessionGate::new(invalidator));

        let transport = Arc::new(
            ReqwestTransport::new(&config.api_base_url)?
                .with_timeout(config.request_timeout())
                .with_interceptor(gate.clone())
                .with_cache(cache.clone()),
        );
        let gateway = Arc::new(HttpAuthGateway::new(transport.clone()));

        {
            let store = store.clone();
            tokio::spawn(async move { store.rehydrate().await });
        }

        let rehydrated = tokio::time::timeout(config.bootstrap_timeout(), store.wait_bootstrapped())
            .await
            .is_ok();
        if rehydrated {
            gate.arm_when_bootstrapped(&store).await;
        } else {
            warn!(
                timeout_ms = config.bootstrap_timeout_ms,
                "rehydration still pending; continuing without a restored session"
            );
            // Arms as soon as rehydration eventually completes.
            let gate = gate.clone();
            let store = store.clone();
            tokio::spawn(async move { gate.arm_when_bootstrapped(&store).await });
        }

        let auto_login = match &config.auto_login_url {
            Some(_) if !rehydrated => {
                warn!("skipping auto-login until a restored session can be ruled out");
                None
            }
            Some(location) => {
                let source = Arc::new(HttpAutoLoginSource::new(transport.clone(), location.clone()));
                Some(
                    AutoLogin::new(source, gateway.clone(), store.clone())
                        .execute()
                        .await,
                )
            }
            None => None,
        };

        let revalidation =
            RevalidateSession::new(gateway.clone(), store.clone(), gate.invalidator().clone())
                .execute()
                .await;

        info!(
            rehydrated,
            gate = ?gate.state(),
            authenticated = store.has_session(),
            "bootstrap complete"
        );

        Ok(Self {
            config,
            store,
            gate,
            transport,
            gateway,
            cache,
            navigator,
            report: BootstrapReport {
                rehydrated,
                auto_login,
                revalidation,
            },
        })
    }

    /// Waits for pending snapshot writes.
    pub async fn shutdown(&self) {
        self.store.flush().await;
    }
}

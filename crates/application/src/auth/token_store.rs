//! Session store with snapshot rehydration.
//!
//! The store is the single mutable shared resource of the session core.
//! `set` and `clear` update the in-memory session synchronously and queue
//! the snapshot write on a background writer, which applies writes in order.
//! Writes are only queued once rehydration has completed, so a mutation
//! racing the initial load can never clobber the snapshot being read.
//! Such a mutation wins over the loaded snapshot and is persisted as soon
//! as rehydration completes.

use std::sync::Arc;

use parking_lot::Mutex;
use sessiongate_domain::{
    Action, CapabilityContext, ResourceKind, Session, Snapshot, can_perform,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::ports::{Clock, SnapshotStorage};

/// Default storage key of the session snapshot.
pub const DEFAULT_SNAPSHOT_KEY: &str = "session";

enum WriteCommand {
    Persist(Option<Session>),
    Flush(oneshot::Sender<()>),
}

enum Phase {
    /// Rehydration pending; `touched` once `set` or `clear` ran.
    Loading { touched: bool },
    Ready,
}

struct Inner {
    session: watch::Sender<Option<Session>>,
    bootstrapped: watch::Sender<bool>,
    phase: Mutex<Phase>,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    writer: mpsc::UnboundedSender<WriteCommand>,
}

/// Thread-safe session store.
///
/// Cloning is cheap and every clone observes the same session.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &self.inner.key)
            .field("bootstrapped", &self.is_bootstrapped())
            .field("has_session", &self.inner.session.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Creates a store persisting under [`DEFAULT_SNAPSHOT_KEY`].
    ///
    /// Must be called from within a Tokio runtime; the snapshot writer is
    /// spawned onto it.
    pub fn new(storage: Arc<dyn SnapshotStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_key(storage, clock, DEFAULT_SNAPSHOT_KEY)
    }

    /// Creates a store persisting under a custom key.
    pub fn with_key(
        storage: Arc<dyn SnapshotStorage>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let (writer, commands) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(commands, storage.clone(), clock, key.clone()));

        Self {
            inner: Arc::new(Inner {
                session: watch::Sender::new(None),
                bootstrapped: watch::Sender::new(false),
                phase: Mutex::new(Phase::Loading { touched: false }),
                storage,
                key,
                writer,
            }),
        }
    }

    /// Loads the snapshot and installs its session, then marks the store
    /// bootstrapped. A missing, unreadable or corrupt snapshot yields
    /// "no session"; nothing is propagated to the caller.
    ///
    /// A session set or cleared while the snapshot was loading is kept
    /// instead and persisted. Returns the session in force afterwards.
    pub async fn rehydrate(&self) -> Option<Session> {
        let restored = read_snapshot(self.inner.storage.as_ref(), &self.inner.key)
            .await
            .and_then(|snapshot| snapshot.session);

        let mut phase = self.inner.phase.lock();
        let session = match *phase {
            Phase::Ready => {
                debug!("store already rehydrated");
                return self.get();
            }
            Phase::Loading { touched: true } => {
                let current = self.get();
                debug!(
                    has_session = current.is_some(),
                    "session changed during rehydration; keeping it"
                );
                self.persist(current.clone());
                current
            }
            Phase::Loading { touched: false } => {
                match &restored {
                    Some(restored) => info!(
                        username = restored.username(),
                        token = %restored.token_preview(),
                        "session rehydrated"
                    ),
                    None => debug!("no session to rehydrate"),
                }
                self.inner.session.send_replace(restored.clone());
                restored
            }
        };
        *phase = Phase::Ready;
        self.inner.bootstrapped.send_replace(true);
        session
    }

    /// The current session.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// The current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|session| session.token().to_string())
    }

    /// Returns true if a session is held.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    /// Replaces the session.
    pub fn set(&self, session: Session) {
        info!(username = session.username(), "session set");
        self.replace(Some(session));
    }

    /// Removes the session, returning the one that was held.
    pub fn clear(&self) -> Option<Session> {
        let previous = self.replace(None);
        if let Some(previous) = &previous {
            info!(username = previous.username(), "session cleared");
        }
        previous
    }

    fn replace(&self, session: Option<Session>) -> Option<Session> {
        let mut phase = self.inner.phase.lock();
        let previous = self.inner.session.send_replace(session.clone());
        match &mut *phase {
            Phase::Ready => self.persist(session),
            Phase::Loading { touched } => {
                *touched = true;
                debug!("store not bootstrapped; persisting once rehydration completes");
            }
        }
        previous
    }

    fn persist(&self, session: Option<Session>) {
        if self.inner.writer.send(WriteCommand::Persist(session)).is_err() {
            warn!("snapshot writer stopped; session change not persisted");
        }
    }

    /// Returns true once rehydration has completed.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        *self.inner.bootstrapped.borrow()
    }

    /// Resolves once rehydration has completed.
    pub async fn wait_bootstrapped(&self) {
        let mut bootstrapped = self.inner.bootstrapped.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = bootstrapped.wait_for(|ready| *ready).await;
    }

    /// Subscribes to session changes. The receiver starts at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Waits until every queued snapshot write has been applied.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.inner.writer.send(WriteCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Evaluates a capability against the current session.
    #[must_use]
    pub fn can_perform(
        &self,
        action: Action,
        resource: ResourceKind,
        context: &CapabilityContext,
    ) -> bool {
        can_perform(action, resource, context, self.inner.session.borrow().as_ref())
    }

    pub(crate) fn storage(&self) -> Arc<dyn SnapshotStorage> {
        self.inner.storage.clone()
    }

    /// The storage key of the snapshot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

/// Reads and decodes the snapshot under `key`. Failures are logged and
/// reported as `None`.
pub(crate) async fn read_snapshot(storage: &dyn SnapshotStorage, key: &str) -> Option<Snapshot> {
    let raw = match storage.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read session snapshot");
            return None;
        }
    };

    decode_snapshot(key, &raw)
}

/// Decodes a stored snapshot, logging and discarding corrupt payloads.
pub(crate) fn decode_snapshot(key: &str, raw: &str) -> Option<Snapshot> {
    match Snapshot::decode(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(key, error = %e, "discarding corrupt session snapshot");
            None
        }
    }
}

async fn run_writer(
    mut commands: mpsc::UnboundedReceiver<WriteCommand>,
    storage: Arc<dyn SnapshotStorage>,
    clock: Arc<dyn Clock>,
    key: String,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WriteCommand::Persist(session) => {
                let snapshot = Snapshot::new(session, clock.now());
                let result = match snapshot.encode() {
                    Ok(raw) => storage.write(&key, &raw).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                if let Err(error) = result {
                    warn!(key = %key, %error, "failed to persist session snapshot");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

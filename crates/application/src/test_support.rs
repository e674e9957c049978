//! In-crate fakes for the ports.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use sessiongate_domain::Session;

use crate::auth::TokenStore;
use crate::ports::{
    AuthGateway, AutoLoginConfig, AutoLoginSource, Clock, DerivedDataCache, ErrorResponse,
    LoginCredentials, Navigator, ProfileChanges, Registration, SnapshotStorage, StorageError,
    TransportError,
};

pub fn session(token: &str, username: &str) -> Session {
    Session::new(token, username, format!("{username}@example.com")).unwrap()
}

pub fn status_error(status: u16, path: &str) -> TransportError {
    TransportError::Status(ErrorResponse::raw(status, path, Value::Null))
}

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    pub writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.values.lock().insert(key.to_string(), value.to_string());
        storage
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Io("read failed".to_string()));
        }
        Ok(self.value(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct RecordingNavigator {
    path: Mutex<String>,
    pub redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().clone()
    }

    fn redirect_to(&self, path: &str) {
        self.redirects.lock().push(path.to_string());
        *self.path.lock() = path.to_string();
    }
}

#[derive(Default)]
pub struct CountingCache {
    pub clears: AtomicUsize,
}

impl CountingCache {
    pub fn count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl DerivedDataCache for CountingCache {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Gateway returning queued results in call order.
#[derive(Default)]
pub struct FakeGateway {
    results: Mutex<VecDeque<Result<Session, TransportError>>>,
    pub logins: Mutex<Vec<LoginCredentials>>,
    pub updates: Mutex<Vec<ProfileChanges>>,
}

impl FakeGateway {
    pub fn returning(result: Result<Session, TransportError>) -> Self {
        let gateway = Self::default();
        gateway.results.lock().push_back(result);
        gateway
    }

    fn next(&self) -> Result<Session, TransportError> {
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted result".to_string())))
    }
}

#[async_trait]
impl AuthGateway for FakeGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, TransportError> {
        self.logins.lock().push(credentials.clone());
        self.next()
    }

    async fn register(&self, _registration: &Registration) -> Result<Session, TransportError> {
        self.next()
    }

    async fn current_user(&self) -> Result<Session, TransportError> {
        self.next()
    }

    async fn update_user(&self, changes: &ProfileChanges) -> Result<Session, TransportError> {
        self.updates.lock().push(changes.clone());
        self.next()
    }
}

pub struct FakeAutoLogin {
    pub config: Result<AutoLoginConfig, TransportError>,
    pub fail_reset: bool,
    pub resets: AtomicUsize,
}

impl FakeAutoLogin {
    pub fn enabled(email: &str, password: &str) -> Self {
        Self {
            config: Ok(AutoLoginConfig {
                auto_login: true,
                email: email.to_string(),
                password: password.to_string(),
            }),
            fail_reset: false,
            resets: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            config: Err(TransportError::Network("connection refused".to_string())),
            fail_reset: false,
            resets: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AutoLoginSource for FakeAutoLogin {
    async fn fetch(&self) -> Result<AutoLoginConfig, TransportError> {
        self.config.clone()
    }

    async fn reset(&self) -> Result<(), TransportError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reset {
            return Err(TransportError::Network("reset failed".to_string()));
        }
        Ok(())
    }
}

/// A bootstrapped store backed by fresh in-memory storage.
pub async fn bootstrapped_store() -> (TokenStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    let store = TokenStore::new(storage.clone(), Arc::new(FixedClock::default()));
    store.rehydrate().await;
    (store, storage)
}

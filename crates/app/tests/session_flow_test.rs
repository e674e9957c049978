//! End-to-end session flows against a local stand-in API.
//!
//! The server issues token `t1` on login, accepts it on `GET /user`, and
//! answers `401` on `GET /articles/feed` so tests can drive invalidation.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

use sessiongate::Runtime;
use sessiongate_application::ports::{
    LoginCredentials, Navigator, SnapshotStorage, StorageError, Transport,
};
use sessiongate_application::{
    AutoLoginOutcome, Invalidation, Login, Revalidation, TokenStore,
};
use sessiongate_domain::{OutboundRequest, Session};
use sessiongate_infrastructure::{
    GateConfig, InMemoryNavigator, InMemorySnapshotStorage, SystemClock,
};

#[derive(Default)]
struct Api {
    seen_auth: Mutex<Vec<Option<String>>>,
    auto_login: AtomicBool,
    auto_login_resets: AtomicUsize,
}

impl Api {
    fn record(&self, headers: &HeaderMap) -> Option<String> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen_auth.lock().unwrap().push(auth.clone());
        auth
    }

    fn last_auth(&self) -> Option<String> {
        self.seen_auth.lock().unwrap().last().cloned().flatten()
    }

    fn requests(&self) -> usize {
        self.seen_auth.lock().unwrap().len()
    }
}

/// In-memory snapshots with a slow read and switchable write failures.
#[derive(Default)]
struct FlakyStorage {
    inner: InMemorySnapshotStorage,
    read_delay: Duration,
    fail_writes: AtomicBool,
}

#[async_trait]
impl SnapshotStorage for FlakyStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        tokio::time::sleep(self.read_delay).await;
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("disk full".to_string()));
        }
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

fn user(token: &str) -> Value {
    json!({"user": {
        "email": "alice@example.com",
        "token": token,
        "username": "alice",
        "bio": null,
        "image": null
    }})
}

async fn login(State(api): State<Arc<Api>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    api.record(&headers);
    if body["user"]["password"] == "hunter22" {
        Json(user("t1")).into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": {"email or password": ["is invalid"]}})),
        )
            .into_response()
    }
}

async fn current_user(State(api): State<Arc<Api>>, headers: HeaderMap) -> Response {
    match api.record(&headers).as_deref() {
        Some("Bearer t1") => Json(user("t1")).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"errors": ["unauthorized"]}))).into_response(),
    }
}

async fn feed(State(api): State<Arc<Api>>, headers: HeaderMap) -> Response {
    api.record(&headers);
    (StatusCode::UNAUTHORIZED, Json(json!({"errors": ["token expired"]}))).into_response()
}

async fn auto_login_doc(State(api): State<Arc<Api>>) -> Json<Value> {
    if api.auto_login.load(Ordering::SeqCst) {
        Json(json!({"autoLogin": true, "email": "alice@example.com", "password": "hunter22"}))
    } else {
        Json(json!({"autoLogin": false, "email": "", "password": ""}))
    }
}

async fn reset_auto_login(State(api): State<Arc<Api>>, Json(body): Json<Value>) -> StatusCode {
    assert_eq!(body, json!({"autoLogin": false, "email": "", "password": ""}));
    api.auto_login.store(false, Ordering::SeqCst);
    api.auto_login_resets.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn serve(api: Arc<Api>) -> String {
    let router = Router::new()
        .route("/api/users/login", post(login))
        .route("/api/user", get(current_user))
        .route("/api/articles/feed", get(feed))
        .route("/api/auto-login.json", get(auto_login_doc).put(reset_auto_login))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn config(base: &str) -> GateConfig {
    GateConfig {
        api_base_url: base.to_string(),
        auto_login_url: None,
        ..GateConfig::default()
    }
}

async fn runtime_at(base: &str, path: &str) -> Runtime {
    Runtime::bootstrap(
        config(base),
        Arc::new(InMemorySnapshotStorage::new()),
        Arc::new(InMemoryNavigator::new(path)),
    )
    .await
    .unwrap()
}

async fn log_in(runtime: &Runtime) -> Session {
    Login::new(runtime.gateway.clone(), runtime.store.clone())
        .execute(&LoginCredentials::new("alice@example.com", "hunter22"))
        .await
        .unwrap()
}

#[tokio::test]
async fn unauthorized_response_clears_session_and_redirects_once() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let runtime = runtime_at(&base, "/editor").await;

    log_in(&runtime).await;
    assert_eq!(runtime.store.token().as_deref(), Some("t1"));

    let err = runtime
        .transport
        .send(OutboundRequest::get("/articles/feed"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(api.last_auth().as_deref(), Some("Bearer t1"));
    assert!(runtime.store.get().is_none());
    assert_eq!(runtime.navigator.redirects(), vec!["/login".to_string()]);

    let before = api.requests();
    runtime
        .transport
        .send(OutboundRequest::get("/articles/feed"))
        .await
        .unwrap_err();
    assert_eq!(api.requests(), before + 1);
    assert_eq!(api.last_auth(), None);
    assert_eq!(runtime.navigator.redirects().len(), 1);
}

#[tokio::test]
async fn cleared_session_is_not_resent_when_snapshot_write_fails() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let storage = Arc::new(FlakyStorage::default());
    let runtime = Runtime::bootstrap(
        config(&base),
        storage.clone(),
        Arc::new(InMemoryNavigator::new("/editor")),
    )
    .await
    .unwrap();

    log_in(&runtime).await;
    runtime.store.flush().await;
    storage.fail_writes.store(true, Ordering::SeqCst);

    runtime
        .transport
        .send(OutboundRequest::get("/articles/feed"))
        .await
        .unwrap_err();
    runtime.store.flush().await;
    assert!(storage.inner.read("session").await.unwrap().is_some());

    runtime
        .transport
        .send(OutboundRequest::get("/user"))
        .await
        .unwrap_err();
    assert_eq!(api.last_auth(), None);
}

#[tokio::test]
async fn auto_login_is_skipped_while_rehydration_is_pending() {
    let api = Arc::new(Api::default());
    api.auto_login.store(true, Ordering::SeqCst);
    let base = serve(api.clone()).await;
    let storage = Arc::new(FlakyStorage {
        read_delay: Duration::from_millis(300),
        ..FlakyStorage::default()
    });

    let runtime = Runtime::bootstrap(
        GateConfig {
            auto_login_url: Some("/auto-login.json".to_string()),
            bootstrap_timeout_ms: 20,
            ..config(&base)
        },
        storage,
        Arc::new(InMemoryNavigator::new("/")),
    )
    .await
    .unwrap();

    assert!(!runtime.report.rehydrated);
    assert_eq!(runtime.report.auto_login, None);
    assert_eq!(runtime.report.revalidation, Revalidation::Skipped);
    assert_eq!(api.requests(), 0);
    assert_eq!(api.auto_login_resets.load(Ordering::SeqCst), 0);

    runtime.store.wait_bootstrapped().await;
    assert!(runtime.store.get().is_none());
}

#[tokio::test]
async fn cached_reads_follow_the_session() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let runtime = runtime_at(&base, "/editor").await;

    let anonymous = runtime.transport.get_json_cached("/user").await.unwrap_err();
    assert_eq!(anonymous.status(), Some(401));

    log_in(&runtime).await;
    let before = api.requests();
    runtime.transport.get_json_cached("/user").await.unwrap();
    runtime.transport.get_json_cached("/user").await.unwrap();
    assert_eq!(api.requests(), before + 1);

    runtime
        .transport
        .send(OutboundRequest::get("/articles/feed"))
        .await
        .unwrap_err();
    assert!(runtime.cache.is_empty());
    let after_invalidation = runtime.transport.get_json_cached("/user").await.unwrap_err();
    assert_eq!(after_invalidation.status(), Some(401));
    assert_eq!(api.last_auth(), None);
}

#[tokio::test]
async fn public_path_clears_without_redirect() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let runtime = runtime_at(&base, "/").await;
    log_in(&runtime).await;

    runtime
        .transport
        .send(OutboundRequest::get("/articles/feed"))
        .await
        .unwrap_err();

    assert!(runtime.store.get().is_none());
    assert!(runtime.navigator.redirects().is_empty());
    assert_eq!(runtime.navigator.current_path(), "/");
}

#[tokio::test]
async fn validation_errors_reach_the_caller_normalized() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let runtime = runtime_at(&base, "/login").await;

    let err = Login::new(runtime.gateway.clone(), runtime.store.clone())
        .execute(&LoginCredentials::new("alice@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    let validation = match err {
        sessiongate_application::ApplicationError::Transport(transport) => {
            transport.response().unwrap().validation().cloned().unwrap()
        }
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(validation.field("email or password"), ["is invalid"]);
    assert!(runtime.navigator.redirects().is_empty());
}

#[tokio::test]
async fn auto_login_runs_once_and_session_is_revalidated() {
    let api = Arc::new(Api::default());
    api.auto_login.store(true, Ordering::SeqCst);
    let base = serve(api.clone()).await;

    let runtime = Runtime::bootstrap(
        GateConfig {
            auto_login_url: Some("/auto-login.json".to_string()),
            ..config(&base)
        },
        Arc::new(InMemorySnapshotStorage::new()),
        Arc::new(InMemoryNavigator::new("/")),
    )
    .await
    .unwrap();

    assert_eq!(
        runtime.report.auto_login,
        Some(AutoLoginOutcome::LoggedIn {
            username: "alice".to_string()
        })
    );
    assert_eq!(api.auto_login_resets.load(Ordering::SeqCst), 1);
    assert!(matches!(runtime.report.revalidation, Revalidation::Refreshed(_)));
    assert_eq!(runtime.store.token().as_deref(), Some("t1"));
}

#[tokio::test]
async fn session_survives_restart_through_snapshot_files() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let dir = tempdir().expect("Failed to create temp directory");
    let file_config = GateConfig {
        snapshot_dir: Some(dir.path().to_path_buf()),
        ..config(&base)
    };

    let first = Runtime::bootstrap_with_files(file_config.clone(), Arc::new(InMemoryNavigator::default()))
        .await
        .unwrap();
    assert_eq!(first.report.revalidation, Revalidation::Skipped);
    log_in(&first).await;
    first.shutdown().await;
    assert!(dir.path().join("session.json").exists());

    let second = Runtime::bootstrap_with_files(file_config, Arc::new(InMemoryNavigator::default()))
        .await
        .unwrap();
    assert!(second.report.rehydrated);
    assert!(matches!(second.report.revalidation, Revalidation::Refreshed(_)));
    assert_eq!(second.store.token().as_deref(), Some("t1"));
}

#[tokio::test]
async fn stale_snapshot_is_invalidated_at_startup() {
    let api = Arc::new(Api::default());
    let base = serve(api.clone()).await;
    let storage = Arc::new(InMemorySnapshotStorage::new());

    let previous = TokenStore::new(storage.clone(), Arc::new(SystemClock::new()));
    previous.rehydrate().await;
    previous.set(Session::new("stale", "alice", "alice@example.com").unwrap());
    previous.flush().await;

    let runtime = Runtime::bootstrap(
        config(&base),
        storage,
        Arc::new(InMemoryNavigator::new("/settings")),
    )
    .await
    .unwrap();

    assert_eq!(api.last_auth().as_deref(), Some("Bearer stale"));
    // The gate already invalidated on the 401, so the use case finds no
    // session left to clear.
    assert_eq!(
        runtime.report.revalidation,
        Revalidation::Invalidated(Invalidation::NoSession)
    );
    assert!(runtime.store.get().is_none());
    assert_eq!(runtime.navigator.redirects(), vec!["/login".to_string()]);
}

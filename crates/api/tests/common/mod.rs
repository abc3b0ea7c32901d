//! Shared harness for API integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use crmsync_api::config::ServerConfig;
use crmsync_api::router::build_app_router;
use crmsync_api::state::AppState;
use crmsync_salesforce::{Credential, NewRemoteContact, RemoteContact, SalesforceError};
use crmsync_sync::memory::MemoryStore;
use crmsync_sync::remote::{CredentialProvider, RemoteContacts};
use crmsync_sync::{SyncError, SyncOrchestrator, SyncSessionFactory};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        sync_interval: Duration::from_secs(30 * 60),
        sync_enabled: false,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool, sessions: Arc<dyn SyncSessionFactory>) -> Router {
    build_test_app_with_config(pool, sessions, test_config())
}

pub fn build_test_app_with_config(
    pool: PgPool,
    sessions: Arc<dyn SyncSessionFactory>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions,
    };
    build_app_router(state, &config)
}

/// A pool that never connects. Endpoints that only go through the session
/// factory work against it; anything touching the pool fails fast.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://crmsync@127.0.0.1:1/crmsync")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scripted Salesforce
// ---------------------------------------------------------------------------

pub struct FakeSalesforce {
    auth_ok: AtomicBool,
    malformed_fetch: AtomicBool,
    reject_create: AtomicBool,
    contacts: Mutex<Vec<RemoteContact>>,
    remote_delay: Mutex<Option<Duration>>,
    pub create_calls: AtomicUsize,
}

impl FakeSalesforce {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            auth_ok: AtomicBool::new(true),
            malformed_fetch: AtomicBool::new(false),
            reject_create: AtomicBool::new(false),
            contacts: Mutex::new(Vec::new()),
            remote_delay: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
        })
    }

    pub fn serve_contacts(&self, contacts: Vec<RemoteContact>) {
        *self.contacts.lock().unwrap() = contacts;
    }

    /// Make every fetch and create take `delay` before answering.
    pub fn slow_remote(&self, delay: Duration) {
        *self.remote_delay.lock().unwrap() = Some(delay);
    }

    async fn delay(&self) {
        let delay = *self.remote_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn reject_auth(&self) {
        self.auth_ok.store(false, Ordering::SeqCst);
    }

    pub fn serve_malformed(&self) {
        self.malformed_fetch.store(true, Ordering::SeqCst);
    }

    pub fn reject_create(&self) {
        self.reject_create.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialProvider for FakeSalesforce {
    async fn authenticate(&self) -> Result<Credential, SalesforceError> {
        if self.auth_ok.load(Ordering::SeqCst) {
            Ok(Credential {
                access_token: "token".to_string(),
                instance_url: "http://fake.salesforce".to_string(),
            })
        } else {
            Err(SalesforceError::ApiError {
                status: 400,
                body: "invalid_client".to_string(),
            })
        }
    }
}

#[async_trait]
impl RemoteContacts for FakeSalesforce {
    async fn fetch_all(&self) -> Result<Vec<RemoteContact>, SalesforceError> {
        self.delay().await;
        if self.malformed_fetch.load(Ordering::SeqCst) {
            let err = serde_json::from_str::<Value>("{").unwrap_err();
            return Err(SalesforceError::Decode(err));
        }
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn create_contact(&self, _contact: &NewRemoteContact) -> Result<String, SalesforceError> {
        self.delay().await;
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject_create.load(Ordering::SeqCst) {
            return Err(SalesforceError::ApiError {
                status: 400,
                body: "REQUIRED_FIELD_MISSING".to_string(),
            });
        }
        Ok(format!("003NEW{n}"))
    }
}

pub fn remote(id: &str, first: &str, last: &str, email: &str) -> RemoteContact {
    RemoteContact {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: String::new(),
        fetched_at: Utc::now(),
    }
}

/// Sessions backed by a shared [`MemoryStore`].
pub struct MemorySessions {
    pub store: MemoryStore,
    pub remote: Arc<FakeSalesforce>,
}

impl MemorySessions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            store: MemoryStore::new(),
            remote: FakeSalesforce::new(),
        })
    }
}

#[async_trait]
impl SyncSessionFactory for MemorySessions {
    async fn open_session(&self) -> Result<SyncOrchestrator, SyncError> {
        Ok(SyncOrchestrator::new(
            Arc::new(self.store.clone()),
            self.remote.clone(),
            self.remote.clone(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

/// Poll until `done` holds, giving up after `limit`.
pub async fn wait_until(limit: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    done()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

//! In-process mock of the Salesforce endpoints the client talks to.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crmsync_salesforce::{SalesforceAuth, SalesforceConfig};

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const ACCESS_TOKEN: &str = "00Dtest!token";

/// Bind `127.0.0.1:0`, build the router with the resulting base URL and
/// serve it in the background. Returns the base URL.
pub async fn spawn_mock<F>(build: F) -> String
where
    F: FnOnce(String) -> Router,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let app = build(base_url.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}

/// An address nothing is listening on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn auth_for(base_url: &str) -> SalesforceAuth {
    SalesforceAuth::new(SalesforceConfig::new(base_url, CLIENT_ID, CLIENT_SECRET))
}

/// Token response pointing the client back at the mock itself.
pub fn token_body(instance_url: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": ACCESS_TOKEN,
        "instance_url": instance_url,
        "token_type": "Bearer",
        "issued_at": "1700000000000",
    })
}

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};

use crmsync_salesforce::SalesforceError;
use common::{auth_for, closed_address, spawn_mock, token_body, ACCESS_TOKEN, CLIENT_ID, CLIENT_SECRET};

const TOKEN_PATH: &str = "/services/oauth2/token";

#[tokio::test]
async fn authenticate_stores_credential() {
    let base = spawn_mock(|base_url| {
        Router::new().route(
            TOKEN_PATH,
            post(move |Form(form): Form<HashMap<String, String>>| async move {
                let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
                    && form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
                    && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET);
                if valid {
                    Json(token_body(&base_url)).into_response()
                } else {
                    StatusCode::BAD_REQUEST.into_response()
                }
            }),
        )
    })
    .await;

    let auth = auth_for(&base);
    let credential = auth.authenticate().await.unwrap();

    assert_eq!(credential.access_token, ACCESS_TOKEN);
    assert_eq!(credential.instance_url, base);
    assert_eq!(auth.current(), Some(credential));
}

#[tokio::test]
async fn rejected_exchange_leaves_cell_empty() {
    let base = spawn_mock(|_| {
        Router::new().route(
            TOKEN_PATH,
            post(|| async { (StatusCode::BAD_REQUEST, r#"{"error":"invalid_client"}"#) }),
        )
    })
    .await;

    let auth = auth_for(&base);
    let err = auth.authenticate().await.unwrap_err();

    assert_matches!(err, SalesforceError::ApiError { status: 400, ref body } if body.contains("invalid_client"));
    assert_eq!(auth.current(), None);
}

#[tokio::test]
async fn failed_exchange_keeps_previous_credential() {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_mock(|base_url| {
        Router::new()
            .route(
                TOKEN_PATH,
                post(
                    move |State(calls): State<Arc<AtomicUsize>>| async move {
                        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                            Json(token_body(&base_url)).into_response()
                        } else {
                            StatusCode::SERVICE_UNAVAILABLE.into_response()
                        }
                    },
                ),
            )
            .with_state(calls.clone())
    })
    .await;

    let auth = auth_for(&base);
    let first = auth.authenticate().await.unwrap();
    assert!(auth.authenticate().await.is_err());

    assert_eq!(auth.current(), Some(first));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_token_body_is_an_error() {
    let base = spawn_mock(|_| {
        Router::new().route(
            TOKEN_PATH,
            post(|| async { Json(serde_json::json!({ "token_type": "Bearer" })) }),
        )
    })
    .await;

    let auth = auth_for(&base);
    assert_matches!(auth.authenticate().await, Err(SalesforceError::Decode(_)));
    assert_eq!(auth.current(), None);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let addr = closed_address().await;
    let auth = auth_for(&format!("http://{addr}"));

    assert_matches!(auth.authenticate().await, Err(SalesforceError::Request(_)));
    assert_eq!(auth.current(), None);
}

pub mod contacts;
pub mod health;
pub mod sync;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /contacts                  list, create (pushes to Salesforce first)
/// /contacts/{id}             get, update (local only), delete
///
/// /sync/contacts             trigger a full contact sync (POST, see router.rs)
/// /sync/runs                 run history, newest first
/// /sync/runs/latest          most recent run
/// /sync/runs/{id}            one run
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/contacts", contacts::router())
        .nest("/sync", sync::router())
}

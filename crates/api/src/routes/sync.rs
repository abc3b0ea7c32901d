use axum::routing::get;
use axum::Router;

use crate::handlers::sync;
use crate::state::AppState;

/// Sync history routes mounted at `/sync`.
///
/// The trigger (`POST /contacts`) is not here: it is mounted by
/// [`crate::router::build_app_router`] outside the request timeout.
///
/// ```text
/// GET    /runs           -> list_runs (?limit=&offset=)
/// GET    /runs/latest    -> latest_run
/// GET    /runs/{id}      -> get_run
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/runs", get(sync::list_runs))
        .route("/runs/latest", get(sync::latest_run))
        .route("/runs/{id}", get(sync::get_run))
}

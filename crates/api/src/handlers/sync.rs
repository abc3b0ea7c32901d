//! Handlers for triggering syncs and reading the run history.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crmsync_core::error::CoreError;
use crmsync_core::search::{
    clamp_limit, clamp_offset, DEFAULT_RUN_HISTORY_LIMIT, MAX_RUN_HISTORY_LIMIT,
};
use crmsync_core::types::DbId;
use crmsync_db::repositories::SyncRunRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, SyncTriggerResponse};
use crate::state::AppState;

/// POST /api/v1/sync/contacts
///
/// Run a full contact sync on a fresh session and wait for it. An
/// authentication failure is not an HTTP error: the run is recorded as
/// failed and the count is 0.
///
/// The run executes on its own task, so a client that disconnects early
/// does not cancel it and its run record still reaches a terminal status.
pub async fn trigger_contact_sync(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = state.sessions.open_session().await?;
    let run = tokio::spawn(async move { session.run_sync().await });
    let count = run.await??;

    tracing::info!(count, "Manual contact sync finished");

    Ok(Json(DataResponse {
        data: SyncTriggerResponse::synced(count),
    }))
}

/// GET /api/v1/sync/runs
pub async fn list_runs(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_RUN_HISTORY_LIMIT, MAX_RUN_HISTORY_LIMIT);
    let offset = clamp_offset(params.offset);

    let runs = SyncRunRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: runs }))
}

/// GET /api/v1/sync/runs/latest
pub async fn latest_run(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let run = SyncRunRepo::latest(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No sync runs recorded yet".to_string()))?;

    Ok(Json(DataResponse { data: run }))
}

/// GET /api/v1/sync/runs/{id}
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let run = SyncRunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SyncRun",
            id,
        }))?;

    Ok(Json(DataResponse { data: run }))
}

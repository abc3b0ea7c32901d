use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crmsync_core::types::{DbId, Timestamp};
use crmsync_db::models::sync_run::SyncRun;
use crmsync_db::repositories::SyncRunRepo;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether this process runs the background sync loop.
    pub sync_scheduled: bool,
    /// Most recent sync run; absent when the database is down or no run
    /// has been recorded.
    pub last_sync: Option<LastSync>,
}

#[derive(Serialize)]
pub struct LastSync {
    pub run_id: DbId,
    pub status: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub records_synced: i32,
}

impl From<SyncRun> for LastSync {
    fn from(run: SyncRun) -> Self {
        Self {
            run_id: run.id,
            status: run.status,
            started_at: run.started_at,
            completed_at: run.completed_at,
            records_synced: run.records_synced,
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = crmsync_db::health_check(&state.pool).await.is_ok();

    let last_sync = if db_healthy {
        match SyncRunRepo::latest(&state.pool).await {
            Ok(run) => run.map(LastSync::from),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not read the latest sync run");
                None
            }
        }
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        sync_scheduled: state.config.sync_enabled,
        last_sync,
    })
}

/// Root-level health route (not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

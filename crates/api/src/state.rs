use std::sync::Arc;

use crmsync_sync::SyncSessionFactory;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for read and manual-edit endpoints.
    pub pool: crmsync_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Opens one sync session per manual trigger or create request.
    pub sessions: Arc<dyn SyncSessionFactory>,
}

//! Audit trail for sync runs.

use chrono::Utc;

use crmsync_core::types::DbId;
use crmsync_db::models::sync_run::{CompleteSyncRun, SyncRun};

use crate::error::SyncError;
use crate::store::SyncRunStore;

/// Persists the lifecycle of one run: `running`, then `success` or `failed`.
///
/// Each call writes before returning.
pub struct SyncRunRecorder<'a, S: SyncRunStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SyncRunStore + ?Sized> SyncRunRecorder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn begin(&self) -> Result<SyncRun, SyncError> {
        Ok(self.store.create_running(Utc::now()).await?)
    }

    pub async fn succeed(&self, id: DbId, records_synced: usize) -> Result<SyncRun, SyncError> {
        let count = i32::try_from(records_synced).unwrap_or(i32::MAX);
        self.complete(id, CompleteSyncRun::success(count, Utc::now()))
            .await
    }

    /// Mark the run failed. `records_synced` keeps whatever it held.
    pub async fn fail(&self, id: DbId, message: impl Into<String>) -> Result<SyncRun, SyncError> {
        self.complete(id, CompleteSyncRun::failure(message, Utc::now()))
            .await
    }

    async fn complete(&self, id: DbId, done: CompleteSyncRun) -> Result<SyncRun, SyncError> {
        self.store
            .complete(id, &done)
            .await?
            .ok_or(SyncError::RunAlreadyCompleted(id))
    }
}

//! Repository for the `sync_runs` table.

use sqlx::PgExecutor;

use crmsync_core::sync_status::SYNC_RUNNING;
use crmsync_core::types::{DbId, Timestamp};

use crate::models::sync_run::{CompleteSyncRun, SyncRun};

/// Column list for `sync_runs` queries.
const COLUMNS: &str = "\
    id, started_at, completed_at, records_synced, status, error_message, \
    created_at, updated_at";

/// Provides query operations for the sync run audit trail.
pub struct SyncRunRepo;

impl SyncRunRepo {
    /// Record the start of a run with status "running".
    pub async fn create_running<'e, E>(
        executor: E,
        started_at: Timestamp,
    ) -> Result<SyncRun, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO sync_runs (started_at, status) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(started_at)
            .bind(SYNC_RUNNING)
            .fetch_one(executor)
            .await
    }

    /// Move a running run to its terminal state.
    ///
    /// Returns `None` when the run does not exist or has already completed;
    /// terminal rows are never rewritten.
    pub async fn complete<'e, E>(
        executor: E,
        id: DbId,
        done: &CompleteSyncRun,
    ) -> Result<Option<SyncRun>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE sync_runs SET \
                status = $2, \
                completed_at = $3, \
                records_synced = COALESCE($4, records_synced), \
                error_message = $5 \
             WHERE id = $1 AND status = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(id)
            .bind(done.status.as_str())
            .bind(done.completed_at)
            .bind(done.records_synced)
            .bind(&done.error_message)
            .bind(SYNC_RUNNING)
            .fetch_optional(executor)
            .await
    }

    /// Find a run by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<SyncRun>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM sync_runs WHERE id = $1");
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The most recently started run, if any.
    pub async fn latest<'e, E>(executor: E) -> Result<Option<SyncRun>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM sync_runs \
             ORDER BY started_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .fetch_optional(executor)
            .await
    }

    /// Run history, most recent first.
    pub async fn list<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<SyncRun>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM sync_runs \
             ORDER BY started_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }
}

//! Sync run audit entity.

use serde::Serialize;
use sqlx::FromRow;

use crmsync_core::sync_status::{SyncRunStatus, UnknownSyncStatus};
use crmsync_core::types::{DbId, Timestamp};

/// A row from the `sync_runs` table (append-only).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SyncRun {
    pub id: DbId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub records_synced: i32,
    /// One of the `crmsync_core::sync_status` names.
    pub status: String,
    /// Set only when `status` is `failed`.
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SyncRun {
    /// Parse the stored status column.
    pub fn status(&self) -> Result<SyncRunStatus, UnknownSyncStatus> {
        self.status.parse()
    }
}

/// Terminal transition for a running sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteSyncRun {
    pub status: SyncRunStatus,
    pub completed_at: Timestamp,
    /// `None` leaves `records_synced` at its current value.
    pub records_synced: Option<i32>,
    pub error_message: Option<String>,
}

impl CompleteSyncRun {
    /// Successful completion with a final count.
    pub fn success(records_synced: i32, completed_at: Timestamp) -> Self {
        Self {
            status: SyncRunStatus::Success,
            completed_at,
            records_synced: Some(records_synced),
            error_message: None,
        }
    }

    /// Failed completion. The count is left untouched.
    pub fn failure(message: impl Into<String>, completed_at: Timestamp) -> Self {
        Self {
            status: SyncRunStatus::Failed,
            completed_at,
            records_synced: None,
            error_message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn failure_keeps_count_and_sets_message() {
        let done = CompleteSyncRun::failure("authentication failed", Utc::now());
        assert_eq!(done.status, SyncRunStatus::Failed);
        assert_eq!(done.records_synced, None);
        assert_eq!(done.error_message.as_deref(), Some("authentication failed"));
    }

    #[test]
    fn success_has_no_message() {
        let done = CompleteSyncRun::success(2, Utc::now());
        assert_eq!(done.status, SyncRunStatus::Success);
        assert_eq!(done.records_synced, Some(2));
        assert!(done.error_message.is_none());
    }

    #[test]
    fn stored_status_parses() {
        let now = Utc::now();
        let run = SyncRun {
            id: 1,
            started_at: now,
            completed_at: None,
            records_synced: 0,
            status: "running".to_string(),
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(run.status(), Ok(SyncRunStatus::Running));
    }
}

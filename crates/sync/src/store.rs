//! Storage seams used by the sync engine.
//!
//! Implemented for a pooled Postgres connection in [`crate::pg`] and for
//! [`crate::memory::MemoryStore`].

use async_trait::async_trait;

use crmsync_core::types::{DbId, Timestamp};
use crmsync_db::models::contact::{Contact, ContactWrite, NewContact};
use crmsync_db::models::sync_run::{CompleteSyncRun, SyncRun};

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn find_by_salesforce_id(
        &self,
        salesforce_id: &str,
    ) -> Result<Option<Contact>, sqlx::Error>;

    /// Apply every write or none of them.
    async fn apply_batch(&self, writes: &[ContactWrite]) -> Result<u64, sqlx::Error>;

    /// Insert one contact, merging on `salesforce_id`.
    async fn upsert(&self, contact: &NewContact) -> Result<Contact, sqlx::Error>;
}

#[async_trait]
pub trait SyncRunStore: Send + Sync {
    async fn create_running(&self, started_at: Timestamp) -> Result<SyncRun, sqlx::Error>;

    /// `None` when the run is missing or no longer running.
    async fn complete(
        &self,
        id: DbId,
        done: &CompleteSyncRun,
    ) -> Result<Option<SyncRun>, sqlx::Error>;
}

/// Everything a run needs from storage.
pub trait SyncStore: ContactStore + SyncRunStore {}

impl<T: ContactStore + SyncRunStore + ?Sized> SyncStore for T {}

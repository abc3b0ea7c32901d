//! Postgres-backed sessions.
//!
//! A session checks one connection out of the pool and holds it until the
//! orchestrator is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex;

use crmsync_core::types::{DbId, Timestamp};
use crmsync_db::models::contact::{Contact, ContactWrite, NewContact};
use crmsync_db::models::sync_run::{CompleteSyncRun, SyncRun};
use crmsync_db::repositories::{ContactRepo, SyncRunRepo};

use crate::error::SyncError;
use crate::orchestrator::SyncOrchestrator;
use crate::remote::{CredentialProvider, RemoteContacts};
use crate::session::SyncSessionFactory;
use crate::store::{ContactStore, SyncRunStore};

/// Storage for one run, backed by a single pooled connection.
pub struct PgSyncStore {
    conn: Mutex<PoolConnection<Postgres>>,
}

impl PgSyncStore {
    pub fn new(conn: PoolConnection<Postgres>) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl ContactStore for PgSyncStore {
    async fn find_by_salesforce_id(
        &self,
        salesforce_id: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        ContactRepo::find_by_salesforce_id(&mut **conn, salesforce_id).await
    }

    async fn apply_batch(&self, writes: &[ContactWrite]) -> Result<u64, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        ContactRepo::apply_batch(&mut **conn, writes).await
    }

    async fn upsert(&self, contact: &NewContact) -> Result<Contact, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        ContactRepo::upsert(&mut **conn, contact).await
    }
}

#[async_trait]
impl SyncRunStore for PgSyncStore {
    async fn create_running(&self, started_at: Timestamp) -> Result<SyncRun, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        SyncRunRepo::create_running(&mut **conn, started_at).await
    }

    async fn complete(
        &self,
        id: DbId,
        done: &CompleteSyncRun,
    ) -> Result<Option<SyncRun>, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        SyncRunRepo::complete(&mut **conn, id, done).await
    }
}

/// Opens Postgres-backed sessions sharing one remote client.
pub struct PgSessionFactory {
    pool: PgPool,
    auth: Arc<dyn CredentialProvider>,
    contacts: Arc<dyn RemoteContacts>,
}

impl PgSessionFactory {
    pub fn new(
        pool: PgPool,
        auth: Arc<dyn CredentialProvider>,
        contacts: Arc<dyn RemoteContacts>,
    ) -> Self {
        Self {
            pool,
            auth,
            contacts,
        }
    }
}

#[async_trait]
impl SyncSessionFactory for PgSessionFactory {
    async fn open_session(&self) -> Result<SyncOrchestrator, SyncError> {
        let conn = self.pool.acquire().await?;
        Ok(SyncOrchestrator::new(
            Arc::new(PgSyncStore::new(conn)),
            Arc::clone(&self.auth),
            Arc::clone(&self.contacts),
        ))
    }
}

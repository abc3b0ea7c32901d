//! In-memory storage with the same semantics as the Postgres repositories.
//!
//! Clones share state, so one `MemoryStore` can back many sessions. Each
//! write path can be switched to fail, which is how tests exercise the
//! persistence-failure branches.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crmsync_core::sync_status::SYNC_RUNNING;
use crmsync_core::types::{DbId, Timestamp};
use crmsync_db::models::contact::{Contact, ContactWrite, NewContact, SyncedFields};
use crmsync_db::models::sync_run::{CompleteSyncRun, SyncRun};

use crate::store::{ContactStore, SyncRunStore};

#[derive(Default)]
struct State {
    contacts: Vec<Contact>,
    runs: Vec<SyncRun>,
    next_contact_id: DbId,
    next_run_id: DbId,
    fail_contact_writes: bool,
    fail_run_writes: bool,
}

impl State {
    fn insert_or_merge(&mut self, input: &NewContact) -> Contact {
        let now = Utc::now();
        let existing = input.salesforce_id.as_ref().and_then(|sf_id| {
            self.contacts
                .iter_mut()
                .find(|c| c.salesforce_id.as_ref() == Some(sf_id))
        });

        if let Some(row) = existing {
            row.first_name = input.first_name.clone();
            row.last_name = input.last_name.clone();
            row.email = input.email.clone();
            row.phone = input.phone.clone();
            row.last_synced_at = input.last_synced_at;
            row.updated_at = now;
            return row.clone();
        }

        self.next_contact_id += 1;
        let row = Contact {
            id: self.next_contact_id,
            salesforce_id: input.salesforce_id.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            company: input.company.clone(),
            last_modified_remote: None,
            last_synced_at: input.last_synced_at,
            created_at: now,
            updated_at: now,
        };
        self.contacts.push(row.clone());
        row
    }

    /// Overwrite the synced fields of the row with `salesforce_id`, or
    /// recreate it without a company if it is gone.
    fn upsert_synced(&mut self, salesforce_id: &str, fields: &SyncedFields) {
        let existing = self
            .contacts
            .iter_mut()
            .find(|c| c.salesforce_id.as_deref() == Some(salesforce_id));

        match existing {
            Some(row) => {
                row.first_name = fields.first_name.clone();
                row.last_name = fields.last_name.clone();
                row.email = Some(fields.email.clone());
                row.phone = Some(fields.phone.clone());
                row.last_synced_at = Some(fields.last_synced_at);
                row.updated_at = Utc::now();
            }
            None => {
                self.insert_or_merge(&NewContact {
                    salesforce_id: Some(salesforce_id.to_string()),
                    first_name: fields.first_name.clone(),
                    last_name: fields.last_name.clone(),
                    email: Some(fields.email.clone()),
                    phone: Some(fields.phone.clone()),
                    company: None,
                    last_synced_at: Some(fields.last_synced_at),
                });
            }
        }
    }
}

fn injected(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("injected failure: {what}"))
}

/// Shared in-memory contact and sync run tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a row directly, bypassing the failure switches.
    pub fn seed_contact(&self, contact: NewContact) -> Contact {
        self.state().insert_or_merge(&contact)
    }

    /// All contacts ordered by id.
    pub fn contacts(&self) -> Vec<Contact> {
        let mut contacts = self.state().contacts.clone();
        contacts.sort_by_key(|c| c.id);
        contacts
    }

    pub fn contact_by_salesforce_id(&self, salesforce_id: &str) -> Option<Contact> {
        self.state()
            .contacts
            .iter()
            .find(|c| c.salesforce_id.as_deref() == Some(salesforce_id))
            .cloned()
    }

    /// All runs in creation order.
    pub fn runs(&self) -> Vec<SyncRun> {
        self.state().runs.clone()
    }

    /// Make contact inserts, updates and batches fail.
    pub fn fail_contact_writes(&self, fail: bool) {
        self.state().fail_contact_writes = fail;
    }

    /// Make sync run creation and completion fail.
    pub fn fail_run_writes(&self, fail: bool) {
        self.state().fail_run_writes = fail;
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn find_by_salesforce_id(
        &self,
        salesforce_id: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        Ok(self.contact_by_salesforce_id(salesforce_id))
    }

    async fn apply_batch(&self, writes: &[ContactWrite]) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        if state.fail_contact_writes {
            return Err(injected("contact batch"));
        }

        for write in writes {
            match write {
                ContactWrite::Insert(input) => {
                    state.insert_or_merge(input);
                }
                ContactWrite::Update {
                    salesforce_id,
                    fields,
                } => state.upsert_synced(salesforce_id, fields),
            }
        }
        Ok(writes.len() as u64)
    }

    async fn upsert(&self, contact: &NewContact) -> Result<Contact, sqlx::Error> {
        let mut state = self.state();
        if state.fail_contact_writes {
            return Err(injected("contact upsert"));
        }
        Ok(state.insert_or_merge(contact))
    }
}

#[async_trait]
impl SyncRunStore for MemoryStore {
    async fn create_running(&self, started_at: Timestamp) -> Result<SyncRun, sqlx::Error> {
        let mut state = self.state();
        if state.fail_run_writes {
            return Err(injected("sync run create"));
        }

        state.next_run_id += 1;
        let now = Utc::now();
        let run = SyncRun {
            id: state.next_run_id,
            started_at,
            completed_at: None,
            records_synced: 0,
            status: SYNC_RUNNING.to_string(),
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        state.runs.push(run.clone());
        Ok(run)
    }

    async fn complete(
        &self,
        id: DbId,
        done: &CompleteSyncRun,
    ) -> Result<Option<SyncRun>, sqlx::Error> {
        let mut state = self.state();
        if state.fail_run_writes {
            return Err(injected("sync run complete"));
        }

        let Some(run) = state.runs.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let current = run
            .status()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        if !current.can_transition_to(done.status) {
            return Ok(None);
        }

        run.status = done.status.as_str().to_string();
        run.completed_at = Some(done.completed_at);
        if let Some(count) = done.records_synced {
            run.records_synced = count;
        }
        run.error_message = done.error_message.clone();
        run.updated_at = Utc::now();
        Ok(Some(run.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! One end-to-end sync run and the manual create-contact path.

use std::sync::Arc;

use chrono::Utc;

use crmsync_db::models::contact::{Contact, CreateContact, NewContact};
use crmsync_db::models::sync_run::SyncRun;
use crmsync_salesforce::NewRemoteContact;

use crate::error::SyncError;
use crate::reconcile::Reconciler;
use crate::recorder::SyncRunRecorder;
use crate::remote::{CredentialProvider, RemoteContacts};
use crate::store::SyncStore;

/// Error message stored on a run whose authentication step failed.
pub const AUTH_FAILED_MESSAGE: &str = "authentication failed";

/// Runs the sync pipeline against one storage handle.
///
/// Obtained per run from a [`crate::SyncSessionFactory`]; dropping it
/// releases the handle.
pub struct SyncOrchestrator {
    store: Arc<dyn SyncStore>,
    auth: Arc<dyn CredentialProvider>,
    contacts: Arc<dyn RemoteContacts>,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn SyncStore>,
        auth: Arc<dyn CredentialProvider>,
        contacts: Arc<dyn RemoteContacts>,
    ) -> Self {
        Self {
            store,
            auth,
            contacts,
        }
    }

    /// Pull every remote contact into local storage.
    ///
    /// Always writes a `sync_runs` row first. An authentication failure
    /// marks the run failed and returns `Ok(0)`. Any error from fetching,
    /// reconciling or recording success marks the run failed with the
    /// error text and is then returned.
    pub async fn run_sync(&self) -> Result<usize, SyncError> {
        let recorder = SyncRunRecorder::new(self.store.as_ref());
        let run = recorder.begin().await?;
        tracing::info!(run_id = run.id, "Contact sync started");

        if let Err(e) = self.auth.authenticate().await {
            tracing::error!(run_id = run.id, error = %e, "Contact sync: authentication failed");
            recorder.fail(run.id, AUTH_FAILED_MESSAGE).await?;
            return Ok(0);
        }

        match self.fetch_and_merge(&recorder, &run).await {
            Ok(count) => {
                tracing::info!(run_id = run.id, count, "Contact sync completed");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(run_id = run.id, error = %e, "Contact sync failed");
                if let Err(record_err) = recorder.fail(run.id, e.to_string()).await {
                    tracing::error!(
                        run_id = run.id,
                        error = %record_err,
                        "Contact sync: could not record failure",
                    );
                }
                Err(e)
            }
        }
    }

    /// Push a new contact to the remote CRM, then store it locally under
    /// the id the remote assigned.
    ///
    /// Returns `Ok(None)` when authentication or the remote create fails;
    /// nothing is stored in that case. No sync run is recorded.
    pub async fn create_contact(
        &self,
        input: &CreateContact,
    ) -> Result<Option<Contact>, SyncError> {
        if let Err(e) = self.auth.authenticate().await {
            tracing::warn!(error = %e, "Create contact: authentication failed");
            return Ok(None);
        }

        let payload = NewRemoteContact {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
        };

        let salesforce_id = match self.contacts.create_contact(&payload).await {
            Ok(id) if !id.is_empty() => id,
            Ok(_) => {
                tracing::warn!("Create contact: Salesforce returned an empty id");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Create contact: Salesforce rejected the contact");
                return Ok(None);
            }
        };

        let row = NewContact::from_remote_create(input, salesforce_id, Utc::now());
        let contact = self.store.upsert(&row).await?;

        tracing::info!(
            contact_id = contact.id,
            salesforce_id = ?contact.salesforce_id,
            "Created contact in Salesforce",
        );
        Ok(Some(contact))
    }

    async fn fetch_and_merge(
        &self,
        recorder: &SyncRunRecorder<'_, dyn SyncStore>,
        run: &SyncRun,
    ) -> Result<usize, SyncError> {
        let batch = self.contacts.fetch_all().await?;
        if batch.is_empty() {
            tracing::info!(run_id = run.id, "Contact sync: no contacts returned");
            recorder.succeed(run.id, 0).await?;
            return Ok(0);
        }

        let count = Reconciler::new(self.store.as_ref())
            .reconcile(&batch)
            .await?;
        recorder.succeed(run.id, count).await?;
        Ok(count)
    }
}

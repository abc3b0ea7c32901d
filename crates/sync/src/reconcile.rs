//! Merges a fetched batch into local storage keyed by remote id.

use chrono::Utc;

use crmsync_db::models::contact::{ContactWrite, NewContact, SyncedFields};
use crmsync_salesforce::RemoteContact;

use crate::error::SyncError;
use crate::store::ContactStore;

pub struct Reconciler<'a, S: ContactStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ContactStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Match every record by `salesforce_id`, queue an update or an insert,
    /// then flush the queue through a single [`ContactStore::apply_batch`].
    ///
    /// Matched rows get the remote-owned fields overwritten; their
    /// `salesforce_id` and `company` are left alone. Returns the number of
    /// queued writes.
    pub async fn reconcile(&self, batch: &[RemoteContact]) -> Result<usize, SyncError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let synced_at = Utc::now();
        let mut writes = Vec::with_capacity(batch.len());
        let mut updated = 0usize;

        for remote in batch {
            match self.store.find_by_salesforce_id(&remote.id).await? {
                Some(_) => {
                    updated += 1;
                    writes.push(ContactWrite::Update {
                        salesforce_id: remote.id.clone(),
                        fields: SyncedFields {
                            first_name: remote.first_name.clone(),
                            last_name: remote.last_name.clone(),
                            email: remote.email.clone(),
                            phone: remote.phone.clone(),
                            last_synced_at: synced_at,
                        },
                    });
                }
                None => writes.push(ContactWrite::Insert(NewContact {
                    salesforce_id: Some(remote.id.clone()),
                    first_name: remote.first_name.clone(),
                    last_name: remote.last_name.clone(),
                    email: Some(remote.email.clone()),
                    phone: Some(remote.phone.clone()),
                    company: None,
                    last_synced_at: Some(synced_at),
                })),
            }
        }

        let touched = self.store.apply_batch(&writes).await?;

        tracing::info!(
            created = writes.len() - updated,
            updated,
            touched,
            "Reconciled contact batch",
        );
        Ok(writes.len())
    }
}

//! Contact entity, manual-edit DTOs and sync write descriptors.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crmsync_core::types::{DbId, Timestamp};

/// A row from the `contacts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    /// Remote CRM identifier. `None` until the first successful create or sync.
    pub salesforce_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Remote modification stamp. Stored but not used for conflict detection.
    pub last_modified_remote: Option<Timestamp>,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Manual create request. Pushed to the remote CRM first, then stored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Manual local edit. Only `Some` fields are applied.
///
/// Edits stay local; the next sync overwrites the fields the remote owns.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// A fully specified row to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub salesforce_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub last_synced_at: Option<Timestamp>,
}

impl NewContact {
    /// Local row for a contact the remote CRM just accepted under `salesforce_id`.
    pub fn from_remote_create(
        input: &CreateContact,
        salesforce_id: String,
        synced_at: Timestamp,
    ) -> Self {
        Self {
            salesforce_id: Some(salesforce_id),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            company: input.company.clone(),
            last_synced_at: Some(synced_at),
        }
    }
}

/// The fields a sync overwrites on a contact matched by remote id.
///
/// `salesforce_id` is immutable after the match and `company` is local-only,
/// so neither appears here.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub last_synced_at: Timestamp,
}

/// One pending write produced by reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactWrite {
    /// No local row carried this remote id at lookup time.
    Insert(NewContact),
    /// Overwrite the synced fields of the row carrying `salesforce_id`.
    ///
    /// Written as an upsert: if the row was deleted after the lookup it is
    /// recreated from `fields`.
    Update {
        salesforce_id: String,
        fields: SyncedFields,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

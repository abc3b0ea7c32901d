//! Contact reads and writes against the Salesforce REST API.
//!
//! Both operations use the credential currently cached by
//! [`SalesforceAuth`]; neither authenticates on its own.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crmsync_core::types::Timestamp;

use crate::auth::{Credential, SalesforceAuth};
use crate::error::SalesforceError;

/// SOQL query used for every full fetch.
pub const CONTACT_QUERY: &str = "SELECT Id, FirstName, LastName, Email, Phone FROM Contact";

/// A contact as fetched from the remote CRM.
///
/// Missing optional fields are normalised to empty strings. All records
/// from one fetch share the same `fetched_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteContact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub fetched_at: Timestamp,
}

/// Payload for `POST sobjects/Contact`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewRemoteContact {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    records: Vec<ContactRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContactRecord {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl ContactRecord {
    fn into_remote(self, fetched_at: Timestamp) -> RemoteContact {
        RemoteContact {
            id: self.id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            fetched_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: String,
}

/// HTTP client for the Contact sobject.
pub struct ContactApi {
    auth: Arc<SalesforceAuth>,
}

impl ContactApi {
    pub fn new(auth: Arc<SalesforceAuth>) -> Self {
        Self { auth }
    }

    /// Fetch every contact visible to the integration user.
    ///
    /// A single query request; pagination via `nextRecordsUrl` is not
    /// followed. A non-2xx status is logged and yields an empty list.
    /// Transport faults and bodies that do not match the query response
    /// shape are returned as errors.
    pub async fn fetch_all(&self) -> Result<Vec<RemoteContact>, SalesforceError> {
        let credential = self.credential()?;
        let url = format!("{}/query", credential.api_base(self.api_version()));

        let response = self
            .auth
            .client()
            .get(url)
            .bearer_auth(&credential.access_token)
            .query(&[("q", CONTACT_QUERY)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                "Salesforce contact query failed",
            );
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        let fetched_at = Utc::now();
        let contacts: Vec<RemoteContact> = parsed
            .records
            .into_iter()
            .map(|record| record.into_remote(fetched_at))
            .collect();

        tracing::debug!(count = contacts.len(), "Fetched contacts from Salesforce");
        Ok(contacts)
    }

    /// Create one contact and return its remote id.
    ///
    /// Sends `POST sobjects/Contact`. Non-2xx statuses surface as
    /// [`SalesforceError::ApiError`]; a success body without `id` as
    /// [`SalesforceError::Decode`].
    pub async fn create_contact(
        &self,
        contact: &NewRemoteContact,
    ) -> Result<String, SalesforceError> {
        let credential = self.credential()?;
        let url = format!("{}/sobjects/Contact", credential.api_base(self.api_version()));

        let response = self
            .auth
            .client()
            .post(url)
            .bearer_auth(&credential.access_token)
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SalesforceError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let created: CreateResponse = serde_json::from_str(&body)?;
        Ok(created.id)
    }

    // ---- private helpers ----

    fn credential(&self) -> Result<Credential, SalesforceError> {
        self.auth.current().ok_or(SalesforceError::NotAuthenticated)
    }

    fn api_version(&self) -> &str {
        &self.auth.config().api_version
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

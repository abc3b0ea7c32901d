//! Remote CRM seams and their Salesforce implementations.

use async_trait::async_trait;

use crmsync_salesforce::{
    ContactApi, Credential, NewRemoteContact, RemoteContact, SalesforceAuth, SalesforceError,
};

/// Produces a credential for the remote CRM.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authenticate(&self) -> Result<Credential, SalesforceError>;
}

/// Reads and creates contacts in the remote CRM.
#[async_trait]
pub trait RemoteContacts: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RemoteContact>, SalesforceError>;

    async fn create_contact(&self, contact: &NewRemoteContact) -> Result<String, SalesforceError>;
}

#[async_trait]
impl CredentialProvider for SalesforceAuth {
    async fn authenticate(&self) -> Result<Credential, SalesforceError> {
        SalesforceAuth::authenticate(self).await
    }
}

#[async_trait]
impl RemoteContacts for ContactApi {
    async fn fetch_all(&self) -> Result<Vec<RemoteContact>, SalesforceError> {
        ContactApi::fetch_all(self).await
    }

    async fn create_contact(&self, contact: &NewRemoteContact) -> Result<String, SalesforceError> {
        ContactApi::create_contact(self, contact).await
    }
}

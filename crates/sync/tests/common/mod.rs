//! Scripted remote CRM and helpers shared by the sync tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crmsync_salesforce::{Credential, NewRemoteContact, RemoteContact, SalesforceError};
use crmsync_sync::memory::MemoryStore;
use crmsync_sync::remote::{CredentialProvider, RemoteContacts};
use crmsync_sync::SyncOrchestrator;

/// What the next fetch returns.
#[derive(Clone)]
pub enum FetchOutcome {
    Contacts(Vec<RemoteContact>),
    /// A body that does not parse as a query response.
    Malformed,
}

/// What a create call returns.
#[derive(Clone)]
pub enum CreateOutcome {
    Id(String),
    Rejected,
}

pub struct FakeSalesforce {
    auth_ok: AtomicBool,
    fetch: Mutex<FetchOutcome>,
    create: Mutex<CreateOutcome>,
    pub auth_calls: AtomicUsize,
    pub created: Mutex<Vec<NewRemoteContact>>,
}

impl FakeSalesforce {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            auth_ok: AtomicBool::new(true),
            fetch: Mutex::new(FetchOutcome::Contacts(Vec::new())),
            create: Mutex::new(CreateOutcome::Id("003NEW".to_string())),
            auth_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn reject_auth(&self) {
        self.auth_ok.store(false, Ordering::SeqCst);
    }

    pub fn serve_contacts(&self, contacts: Vec<RemoteContact>) {
        *self.fetch.lock().unwrap() = FetchOutcome::Contacts(contacts);
    }

    pub fn serve_malformed(&self) {
        *self.fetch.lock().unwrap() = FetchOutcome::Malformed;
    }

    pub fn create_returns(&self, outcome: CreateOutcome) {
        *self.create.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl CredentialProvider for FakeSalesforce {
    async fn authenticate(&self) -> Result<Credential, SalesforceError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if self.auth_ok.load(Ordering::SeqCst) {
            Ok(Credential {
                access_token: "token".to_string(),
                instance_url: "http://fake.salesforce".to_string(),
            })
        } else {
            Err(SalesforceError::ApiError {
                status: 400,
                body: "invalid_client".to_string(),
            })
        }
    }
}

#[async_trait]
impl RemoteContacts for FakeSalesforce {
    async fn fetch_all(&self) -> Result<Vec<RemoteContact>, SalesforceError> {
        let outcome = self.fetch.lock().unwrap().clone();
        match outcome {
            FetchOutcome::Contacts(contacts) => Ok(contacts),
            FetchOutcome::Malformed => {
                let err = serde_json::from_str::<serde_json::Value>("{\"records\": [").unwrap_err();
                Err(SalesforceError::Decode(err))
            }
        }
    }

    async fn create_contact(&self, contact: &NewRemoteContact) -> Result<String, SalesforceError> {
        self.created.lock().unwrap().push(contact.clone());
        let outcome = self.create.lock().unwrap().clone();
        match outcome {
            CreateOutcome::Id(id) => Ok(id),
            CreateOutcome::Rejected => Err(SalesforceError::ApiError {
                status: 400,
                body: "REQUIRED_FIELD_MISSING".to_string(),
            }),
        }
    }
}

pub fn remote(id: &str, first: &str, last: &str, email: &str) -> RemoteContact {
    RemoteContact {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: String::new(),
        fetched_at: Utc::now(),
    }
}

pub fn orchestrator(store: &MemoryStore, fake: &Arc<FakeSalesforce>) -> SyncOrchestrator {
    SyncOrchestrator::new(Arc::new(store.clone()), fake.clone(), fake.clone())
}

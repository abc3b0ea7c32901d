//! Salesforce REST client used by the contact sync engine.
//!
//! - [`SalesforceAuth`] runs the client-credentials exchange and caches the
//!   resulting bearer token and instance URL.
//! - [`ContactApi`] reads the full contact set and creates single contacts
//!   using whatever credential is currently cached.

pub mod auth;
pub mod config;
pub mod contacts;
pub mod error;

pub use auth::{Credential, SalesforceAuth};
pub use config::SalesforceConfig;
pub use contacts::{ContactApi, NewRemoteContact, RemoteContact, CONTACT_QUERY};
pub use error::SalesforceError;

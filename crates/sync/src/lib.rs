//! Contact sync engine.
//!
//! One run authenticates against Salesforce, pulls every contact, merges
//! the batch into local storage keyed by remote id and records the outcome
//! as a `sync_runs` row. The [`scheduler`] repeats that on an interval; the
//! HTTP layer triggers it on demand.
//!
//! Storage and the remote CRM sit behind traits ([`store`], [`remote`]) so
//! runs can be driven against Postgres or the in-memory store.

pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod pg;
pub mod reconcile;
pub mod recorder;
pub mod remote;
pub mod scheduler;
pub mod session;
pub mod store;

pub use error::SyncError;
pub use orchestrator::SyncOrchestrator;
pub use scheduler::SyncScheduler;
pub use session::SyncSessionFactory;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement methods accept any [`sqlx::PgExecutor`] so callers can
//! pass either `&PgPool` or a connection checked out for a sync run;
//! multi-statement methods accept an [`sqlx::Acquire`] and open their own
//! transaction.

pub mod contact_repo;
pub mod sync_run_repo;

pub use contact_repo::ContactRepo;
pub use sync_run_repo::SyncRunRepo;

//! Shared domain primitives for crmsync.
//!
//! Zero internal dependencies so the repository layer, the sync engine and
//! the HTTP layer can all use the same ids, timestamps, status names and
//! query helpers.

pub mod error;
pub mod search;
pub mod sync_status;
pub mod types;

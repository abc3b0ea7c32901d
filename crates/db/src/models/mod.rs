//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches coming from the HTTP layer
//! - Write descriptors produced by the sync engine

pub mod contact;
pub mod sync_run;

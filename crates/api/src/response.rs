//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Result of a manual sync trigger.
#[derive(Debug, Serialize)]
pub struct SyncTriggerResponse {
    pub message: String,
    pub count: usize,
}

impl SyncTriggerResponse {
    pub fn synced(count: usize) -> Self {
        Self {
            message: format!("Synced {count} contacts from Salesforce"),
            count,
        }
    }
}

//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Contact listing parameters (`?search=&limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    /// Case-insensitive substring matched against name, email and company.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

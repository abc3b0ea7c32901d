use crate::types::DbId;

/// Domain-level errors shared by the repository, sync and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The remote CRM refused or could not complete a request.
    #[error("Upstream CRM error: {0}")]
    Upstream(String),
}

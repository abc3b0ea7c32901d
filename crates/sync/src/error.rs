use crmsync_core::types::DbId;
use crmsync_salesforce::SalesforceError;

/// Errors that escape a sync run or a create-contact call.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Salesforce error: {0}")]
    Salesforce(#[from] SalesforceError),

    /// A terminal transition was attempted on a run that is not running.
    #[error("Sync run {0} is not running")]
    RunAlreadyCompleted(DbId),
}

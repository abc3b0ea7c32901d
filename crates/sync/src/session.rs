use async_trait::async_trait;

use crate::error::SyncError;
use crate::orchestrator::SyncOrchestrator;

/// Opens a fresh [`SyncOrchestrator`] bound to its own storage handle.
///
/// Each run (scheduled or manual) opens its own session and drops it when
/// done, so concurrent runs never share a connection.
#[async_trait]
pub trait SyncSessionFactory: Send + Sync {
    async fn open_session(&self) -> Result<SyncOrchestrator, SyncError>;
}

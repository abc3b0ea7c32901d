//! Periodic contact sync.
//!
//! Runs one sync immediately, then one per interval, until the
//! cancellation token fires. Each iteration opens its own session.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::session::SyncSessionFactory;

/// Default time between scheduled runs: 30 minutes.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub struct SyncScheduler {
    sessions: Arc<dyn SyncSessionFactory>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(sessions: Arc<dyn SyncSessionFactory>, interval: Duration) -> Self {
        Self { sessions, interval }
    }

    /// Run the loop until `cancel` is triggered.
    ///
    /// Cancellation is checked between runs and during the wait; a run that
    /// has started always finishes. Failures are logged and the loop goes on.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Contact sync scheduler started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.run_once().await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Contact sync scheduler stopping");
    }

    async fn run_once(&self) {
        let session = match self.sessions.open_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Scheduled sync: could not open session");
                return;
            }
        };

        match session.run_sync().await {
            Ok(count) => tracing::info!(count, "Scheduled sync finished"),
            Err(e) => tracing::error!(error = %e, "Scheduled sync failed"),
        }
    }
}

/// Wait for a cancelled scheduler task to exit.
///
/// After `grace` a warning is logged and the wait continues: a run that is
/// still in flight is allowed to record its outcome rather than being
/// dropped with its row left `running`.
pub async fn wait_for_shutdown(
    mut handle: JoinHandle<()>,
    grace: Duration,
) -> Result<(), JoinError> {
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Sync still in progress at shutdown, waiting for it to finish"
            );
            handle.await
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Sync run status names and the run state machine.
//!
//! The string values must match the `CHECK` constraint on
//! `sync_runs.status` in `20260218000002_create_sync_runs_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The run has been recorded and has not finished yet.
pub const SYNC_RUNNING: &str = "running";

/// The run finished and its count is final.
pub const SYNC_SUCCESS: &str = "success";

/// The run finished with an error message.
pub const SYNC_FAILED: &str = "failed";

/// Lifecycle state of a single sync run.
///
/// `Running -> Success | Failed`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncRunStatus {
    Running,
    Success,
    Failed,
}

impl SyncRunStatus {
    /// The value stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => SYNC_RUNNING,
            Self::Success => SYNC_SUCCESS,
            Self::Failed => SYNC_FAILED,
        }
    }

    /// Whether no further transition is allowed out of this state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: SyncRunStatus) -> bool {
        self == Self::Running && next.is_terminal()
    }
}

impl fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not a known state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sync run status: {0}")]
pub struct UnknownSyncStatus(pub String);

impl FromStr for SyncRunStatus {
    type Err = UnknownSyncStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SYNC_RUNNING => Ok(Self::Running),
            SYNC_SUCCESS => Ok(Self::Success),
            SYNC_FAILED => Ok(Self::Failed),
            other => Err(UnknownSyncStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

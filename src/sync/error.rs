use thiserror::Error;
use tokio::task::JoinHandle;

use crate::models::User;

/// Why a sync cycle ended without updating the cached user.
///
/// None of these leave the sync service: they are logged and the next
/// trigger simply runs the procedure again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The identity lacks a field the remote needs.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("remote call failed: {0}")]
    Remote(String),

    #[error("remote returned no user record")]
    EmptyResult,

    /// A newer cycle already applied its result.
    #[error("response for cycle {sequence} is stale")]
    Stale { sequence: u64 },

    /// The spawned task panicked or was cancelled.
    #[error("sync task did not complete: {0}")]
    Task(String),
}

/// What a trigger did.
#[derive(Debug)]
pub enum SyncCycle {
    /// The trigger carried the same value as before.
    Unchanged,
    /// Auth is still loading or nobody is signed in.
    Waiting,
    /// The identity was incomplete; no remote call was made.
    Rejected(SyncError),
    /// The ensure-user call is in flight.
    Dispatched(JoinHandle<Result<User, SyncError>>),
}

impl SyncCycle {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SyncCycle::Dispatched(_))
    }

    /// Waits for a dispatched call. Returns `None` when nothing was dispatched.
    pub async fn outcome(self) -> Option<Result<User, SyncError>> {
        match self {
            SyncCycle::Dispatched(handle) => Some(match handle.await {
                Ok(result) => result,
                Err(e) => Err(SyncError::Task(e.to_string())),
            }),
            _ => None,
        }
    }
}

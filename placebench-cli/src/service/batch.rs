//! Fail-fast batch errors

use std::fmt;

use placebench_client::ClientError;
use thiserror::Error;

/// The operation a batch was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Register,
    Deregister,
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchAction::Register => write!(f, "registering"),
            BatchAction::Deregister => write!(f, "deregistering"),
        }
    }
}

/// A batch stopped at its first failing item
///
/// Items before the failing one were applied and are not rolled back.
#[derive(Debug, Error)]
#[error("failed {action} job {job_id} ({completed} of {total} succeeded before the failure)")]
pub struct BatchAbort {
    pub action: BatchAction,
    /// Items applied before the failure
    pub completed: usize,
    pub total: usize,
    pub job_id: String,
    #[source]
    pub source: ClientError,
}

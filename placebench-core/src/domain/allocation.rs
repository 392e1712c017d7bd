//! Allocation domain types
//!
//! Allocations are owned by the orchestrator. Placebench only reads them, so
//! these types deserialize straight from the orchestrator's listing.

use serde::{Deserialize, Serialize};

/// One job instance placed on one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Allocation {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "JobID", default)]
    pub job_id: String,
    #[serde(default)]
    pub task_group: String,
    pub client_status: ClientStatus,
}

/// Client-side status of an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Pending,
    Running,
    Complete,
    Failed,
    Lost,
    /// Anything this client does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientStatus::Pending => write!(f, "pending"),
            ClientStatus::Running => write!(f, "running"),
            ClientStatus::Complete => write!(f, "complete"),
            ClientStatus::Failed => write!(f, "failed"),
            ClientStatus::Lost => write!(f, "lost"),
            ClientStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of one allocation listing query
///
/// `last_index` is the orchestrator's index for the returned data, used as
/// the wait index of the next blocking query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSnapshot {
    pub allocations: Vec<Allocation>,
    pub last_index: u64,
}

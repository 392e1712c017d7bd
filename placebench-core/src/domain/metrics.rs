//! Aggregate placement metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::allocation::{Allocation, ClientStatus};

/// The aggregate metrics reported to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Every allocation the orchestrator knows about
    Placed,
    /// Allocations with client status `pending`
    Booting,
    /// Allocations with client status `running`
    Running,
}

impl Metric {
    /// All metrics, in emission order
    pub const ALL: [Metric; 3] = [Metric::Placed, Metric::Booting, Metric::Running];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Placed => "placed",
            Metric::Booting => "booting",
            Metric::Running => "running",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts derived from a single allocation listing
///
/// Always recomputed from the full listing, never patched incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateCounts {
    pub total: u64,
    pub pending: u64,
    pub running: u64,
}

impl AggregateCounts {
    /// Classifies every allocation by client status
    ///
    /// Statuses other than pending and running count toward `total` only.
    pub fn from_allocations(allocations: &[Allocation]) -> Self {
        let mut counts = Self {
            total: allocations.len() as u64,
            ..Self::default()
        };

        for alloc in allocations {
            match alloc.client_status {
                ClientStatus::Pending => counts.pending += 1,
                ClientStatus::Running => counts.running += 1,
                _ => {}
            }
        }

        counts
    }

    /// Allocations that are neither pending nor running
    pub fn other(&self) -> u64 {
        self.total - self.pending - self.running
    }

    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Placed => self.total,
            Metric::Booting => self.pending,
            Metric::Running => self.running,
        }
    }
}

/// One metric value captured at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric: Metric,
    pub value: u64,
    pub timestamp: DateTime<Utc>,
}

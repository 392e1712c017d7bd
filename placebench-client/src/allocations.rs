//! Allocation listing with blocking-query support
//!
//! The orchestrator supports long-poll reads: a request carrying `index=N`
//! is held open until the data's index exceeds `N` or the `wait` time
//! elapses. The index of the returned data travels in [`INDEX_HEADER`].

use std::time::Duration;

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};
use placebench_core::domain::allocation::{Allocation, AllocationSnapshot};

/// Response header carrying the index of the returned data
pub const INDEX_HEADER: &str = "X-Nomad-Index";

/// Parameters of a (possibly blocking) read query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Hold the request until the index exceeds this value; 0 disables blocking
    pub wait_index: u64,
    /// Upper bound the server may hold the request for
    pub wait_time: Option<Duration>,
    /// Allow any server, not just the leader, to answer
    pub allow_stale: bool,
}

impl QueryOptions {
    /// Stale-tolerant blocking query on `wait_index` with the server's default wait
    pub fn blocking(wait_index: u64) -> Self {
        Self {
            wait_index,
            wait_time: None,
            allow_stale: true,
        }
    }

    pub fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = Some(wait_time);
        self
    }

    fn to_query_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.wait_index > 0 {
            pairs.push(("index", self.wait_index.to_string()));
        }
        if let Some(wait) = self.wait_time {
            pairs.push(("wait", format!("{}s", wait.as_secs().max(1))));
        }
        if self.allow_stale {
            pairs.push(("stale", "true".to_string()));
        }
        pairs
    }
}

impl OrchestratorClient {
    // =============================================================================
    // Allocations
    // =============================================================================

    /// List all allocations
    ///
    /// With a non-zero `wait_index` this is a blocking query and may take up to
    /// the server's wait time to return.
    pub async fn list_allocations(&self, options: &QueryOptions) -> Result<AllocationSnapshot> {
        let url = format!("{}/v1/allocations", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&options.to_query_pairs())
            .send()
            .await?;

        let response = self.ensure_success(response).await?;
        let last_index = parse_index_header(&response)?;
        let allocations: Vec<Allocation> = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse allocation listing: {}", e))
        })?;

        Ok(AllocationSnapshot {
            allocations,
            last_index,
        })
    }
}

fn parse_index_header(response: &reqwest::Response) -> Result<u64> {
    let raw = response
        .headers()
        .get(INDEX_HEADER)
        .ok_or_else(|| ClientError::ParseError(format!("Missing {} header", INDEX_HEADER)))?;

    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| ClientError::ParseError(format!("Malformed {} header: {:?}", INDEX_HEADER, raw)))
}

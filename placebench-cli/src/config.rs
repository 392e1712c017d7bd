//! Configuration module
//!
//! Global CLI settings plus the tuning knobs of the allocation watch.

use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the orchestrator HTTP API
    pub orchestrator_url: String,
}

/// Allocation watch configuration
///
/// All timeouts and intervals are configurable to allow tuning the watch for
/// clusters of different size and latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// How long the orchestrator may hold a blocking query open
    pub wait_time: Duration,

    /// Minimum spacing between the starts of two consecutive queries
    pub min_query_interval: Duration,

    /// Extra time on top of `wait_time` before the client gives up on a query
    pub request_grace: Duration,
}

impl WatchConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            wait_time: Duration::from_secs(300),
            min_query_interval: Duration::from_millis(100),
            request_grace: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional):
    /// - PLACEBENCH_WATCH_WAIT_SECS (default: 300)
    /// - PLACEBENCH_WATCH_MIN_INTERVAL_MS (default: 100)
    /// - PLACEBENCH_WATCH_REQUEST_GRACE_SECS (default: 30)
    ///
    /// A variable that is set but not a non-negative integer is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::new();

        let read = |key: &str| -> anyhow::Result<Option<u64>> {
            match lookup(key) {
                None => Ok(None),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got {:?}", key, raw)),
            }
        };

        Ok(Self {
            wait_time: read("PLACEBENCH_WATCH_WAIT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.wait_time),
            min_query_interval: read("PLACEBENCH_WATCH_MIN_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_query_interval),
            request_grace: read("PLACEBENCH_WATCH_REQUEST_GRACE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_grace),
        })
    }

    /// Client-side timeout for one blocking query
    pub fn request_timeout(&self) -> Duration {
        self.wait_time.saturating_add(self.request_grace)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.wait_time.as_secs() == 0 {
            anyhow::bail!("wait_time must be at least one second");
        }

        if self.request_grace.is_zero() {
            anyhow::bail!("request_grace must be greater than 0");
        }

        if self.wait_time.checked_add(self.request_grace).is_none() {
            anyhow::bail!("wait_time plus request_grace is out of range");
        }

        Ok(())
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

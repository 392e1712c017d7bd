//! Allocation watcher
//!
//! Each iteration issues one stale-tolerant blocking query keyed on the
//! current cursor, folds the result into the [`WatchState`] and publishes the
//! metric samples that changed. Query failures are logged and retried; they
//! never end the watch and never move the cursor.

use chrono::Utc;
use placebench_client::QueryOptions;
use placebench_core::domain::watch::{Observation, WatchState};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::repository::{AllocationRepository, MetricsRepository};

/// What one iteration of the watch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The query failed; nothing changed
    QueryFailed,
    /// The query returned the index already held
    Unchanged,
    /// The query returned an index behind the cursor
    Behind,
    /// The cursor advanced and `published` samples were sent
    Advanced { published: usize, failed: usize },
}

/// Watches allocation state and publishes aggregate placement metrics
pub struct AllocationWatcher<A, M> {
    allocations: A,
    metrics: M,
    config: WatchConfig,
    last_query: Option<Instant>,
}

impl<A: AllocationRepository, M: MetricsRepository> AllocationWatcher<A, M> {
    pub fn new(allocations: A, metrics: M, config: WatchConfig) -> Self {
        Self {
            allocations,
            metrics,
            config,
            last_query: None,
        }
    }

    /// Runs the watch forever
    ///
    /// The state lives only as long as this call; a new call starts from the
    /// initial cursor.
    pub async fn run(&mut self) {
        info!(
            "Starting allocation watch (wait: {:?}, min interval: {:?})",
            self.config.wait_time, self.config.min_query_interval
        );

        let mut state = WatchState::new();
        loop {
            let (next, _) = self.iterate(state).await;
            state = next;
        }
    }

    /// Performs one query and publishes whatever changed
    pub async fn iterate(&mut self, state: WatchState) -> (WatchState, IterationOutcome) {
        self.pace().await;

        let options =
            QueryOptions::blocking(state.cursor.index()).with_wait_time(self.config.wait_time);

        let snapshot = match self.allocations.list(&options).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_timeout() => {
                debug!("Allocation query timed out at index {}", state.cursor.index());
                return (state, IterationOutcome::QueryFailed);
            }
            Err(e) => {
                warn!("Failed querying allocations: {}", e);
                return (state, IterationOutcome::QueryFailed);
            }
        };
        let observed_at = Utc::now();

        let (state, observation) = state.observe(&snapshot, observed_at);

        let outcome = match observation {
            Observation::Unchanged => {
                debug!("No allocation changes at index {}", snapshot.last_index);
                IterationOutcome::Unchanged
            }
            Observation::Behind { returned } => {
                debug!(
                    "Ignoring index {} behind cursor {}",
                    returned,
                    state.cursor.index()
                );
                IterationOutcome::Behind
            }
            Observation::Advanced { counts, samples } => {
                if !samples.is_empty() {
                    info!(
                        "index {}: placed={} booting={} running={}",
                        state.cursor.index(),
                        counts.total,
                        counts.pending,
                        counts.running
                    );
                }

                let mut failed = 0;
                for sample in &samples {
                    if let Err(e) = self.metrics.publish(sample).await {
                        warn!("Failed sending metric {}: {}", sample.metric, e);
                        failed += 1;
                    }
                }

                IterationOutcome::Advanced {
                    published: samples.len() - failed,
                    failed,
                }
            }
        };

        (state, outcome)
    }

    /// Flushes and closes the metrics connection
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.metrics.close().await {
            warn!("Failed closing status connection: {}", e);
        }
    }

    /// Keeps query starts at least `min_query_interval` apart
    async fn pace(&mut self) {
        if let Some(last) = self.last_query {
            tokio::time::sleep_until(last + self.config.min_query_interval).await;
        }
        self.last_query = Some(Instant::now());
    }
}

//! Allocation watch state
//!
//! The state carried between iterations of the allocation watch loop: the
//! blocking-query cursor and the last value emitted for each metric. The loop
//! owns a [`WatchState`] by value, hands it to [`WatchState::observe`] with
//! each successful query result and gets the next state back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::allocation::AllocationSnapshot;
use crate::domain::metrics::{AggregateCounts, Metric, MetricSample};

/// Last observed orchestrator index
///
/// Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WatchCursor(u64);

impl WatchCursor {
    /// Index sent on the very first query
    pub const START: u64 = 1;

    pub fn start() -> Self {
        Self(Self::START)
    }

    pub fn index(&self) -> u64 {
        self.0
    }

    /// Moves the cursor to `index` if it is strictly greater
    ///
    /// Returns whether the cursor moved.
    pub fn advance(&mut self, index: u64) -> bool {
        if index > self.0 {
            self.0 = index;
            true
        } else {
            false
        }
    }
}

impl Default for WatchCursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Last value emitted per metric
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedMetrics {
    last: HashMap<Metric, u64>,
}

impl EmittedMetrics {
    pub fn last(&self, metric: Metric) -> Option<u64> {
        self.last.get(&metric).copied()
    }

    /// Produces a sample for every metric whose value differs from the last
    /// one emitted, and records those values as emitted
    ///
    /// A metric that was never emitted always produces a sample.
    pub fn diff(&mut self, counts: &AggregateCounts, timestamp: DateTime<Utc>) -> Vec<MetricSample> {
        let mut samples = Vec::new();

        for metric in Metric::ALL {
            let value = counts.value(metric);
            if self.last(metric) == Some(value) {
                continue;
            }
            self.last.insert(metric, value);
            samples.push(MetricSample {
                metric,
                value,
                timestamp,
            });
        }

        samples
    }
}

/// What a single query result meant for the watch
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Same index as the cursor: the long-poll timed out without news
    Unchanged,
    /// Index lower than the cursor, served by a lagging replica
    Behind { returned: u64 },
    /// Cursor advanced; counts recomputed, `samples` holds the changes
    Advanced {
        counts: AggregateCounts,
        samples: Vec<MetricSample>,
    },
}

/// State of one allocation watch, scoped to a single `status` invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchState {
    pub cursor: WatchCursor,
    pub emitted: EmittedMetrics,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one successful query result into the state
    ///
    /// Counts are only recomputed when the returned index is strictly ahead
    /// of the cursor.
    pub fn observe(
        mut self,
        snapshot: &AllocationSnapshot,
        observed_at: DateTime<Utc>,
    ) -> (Self, Observation) {
        let held = self.cursor.index();

        if snapshot.last_index == held {
            return (self, Observation::Unchanged);
        }
        if !self.cursor.advance(snapshot.last_index) {
            return (
                self,
                Observation::Behind {
                    returned: snapshot.last_index,
                },
            );
        }

        let counts = AggregateCounts::from_allocations(&snapshot.allocations);
        let samples = self.emitted.diff(&counts, observed_at);

        (self, Observation::Advanced { counts, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::{Allocation, ClientStatus};

    fn snapshot(index: u64, statuses: &[ClientStatus]) -> AllocationSnapshot {
        AllocationSnapshot {
            allocations: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| Allocation {
                    id: format!("alloc-{}", i),
                    job_id: "job-0".to_string(),
                    task_group: "cache".to_string(),
                    client_status: *status,
                })
                .collect(),
            last_index: index,
        }
    }

    fn values(samples: &[MetricSample]) -> Vec<(Metric, u64)> {
        samples.iter().map(|s| (s.metric, s.value)).collect()
    }

    #[test]
    fn test_cursor_starts_at_sentinel() {
        assert_eq!(WatchCursor::start().index(), 1);
        assert_eq!(WatchState::new().cursor.index(), WatchCursor::START);
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let mut cursor = WatchCursor::start();
        assert!(cursor.advance(5));
        assert!(!cursor.advance(5));
        assert!(!cursor.advance(3));
        assert_eq!(cursor.index(), 5);
        assert!(cursor.advance(9));
        assert_eq!(cursor.index(), 9);
    }

    #[test]
    fn test_first_observation_emits_all_metrics() {
        use ClientStatus::*;
        let now = Utc::now();

        let (state, obs) = WatchState::new().observe(&snapshot(5, &[Running, Pending, Running]), now);

        assert_eq!(state.cursor.index(), 5);
        match obs {
            Observation::Advanced { counts, samples } => {
                assert_eq!(counts.total, 3);
                assert_eq!(
                    values(&samples),
                    vec![
                        (Metric::Placed, 3),
                        (Metric::Booting, 1),
                        (Metric::Running, 2)
                    ]
                );
                assert!(samples.iter().all(|s| s.timestamp == now));
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_first_observation_emits_zero_values() {
        let (_, obs) = WatchState::new().observe(&snapshot(2, &[]), Utc::now());

        match obs {
            Observation::Advanced { samples, .. } => {
                assert_eq!(
                    values(&samples),
                    vec![
                        (Metric::Placed, 0),
                        (Metric::Booting, 0),
                        (Metric::Running, 0)
                    ]
                );
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_index_is_a_no_op() {
        use ClientStatus::*;
        let (state, _) = WatchState::new().observe(&snapshot(5, &[Running]), Utc::now());
        let before = state.clone();

        // different data at the same index still must not be looked at
        let (state, obs) = state.observe(&snapshot(5, &[Pending, Pending]), Utc::now());

        assert_eq!(obs, Observation::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_same_counts_at_higher_index_advance_without_samples() {
        use ClientStatus::*;
        let data = [Running, Pending, Running];
        let (state, _) = WatchState::new().observe(&snapshot(5, &data), Utc::now());

        let (state, obs) = state.observe(&snapshot(8, &data), Utc::now());

        assert_eq!(state.cursor.index(), 8);
        match obs {
            Observation::Advanced { samples, .. } => assert!(samples.is_empty()),
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_only_changed_metrics_emit() {
        use ClientStatus::*;
        let (state, _) = WatchState::new().observe(&snapshot(5, &[Running, Pending, Running]), Utc::now());

        // pending allocation started running; total unchanged
        let (state, obs) = state.observe(&snapshot(6, &[Running, Running, Running]), Utc::now());

        match obs {
            Observation::Advanced { samples, .. } => {
                assert_eq!(
                    values(&samples),
                    vec![(Metric::Booting, 0), (Metric::Running, 3)]
                );
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
        assert_eq!(state.emitted.last(Metric::Placed), Some(3));
        assert_eq!(state.emitted.last(Metric::Running), Some(3));
    }

    #[test]
    fn test_lower_index_is_ignored() {
        use ClientStatus::*;
        let (state, _) = WatchState::new().observe(&snapshot(10, &[Running]), Utc::now());
        let before = state.clone();

        let (state, obs) = state.observe(&snapshot(7, &[Pending, Pending]), Utc::now());

        assert_eq!(obs, Observation::Behind { returned: 7 });
        assert_eq!(state, before);
    }

    #[test]
    fn test_cursor_non_decreasing_over_sequence() {
        let indexes = [1, 4, 4, 2, 9, 9, 15, 3, 15, 20];
        let mut state = WatchState::new();
        let mut previous = state.cursor.index();

        for index in indexes {
            let (next, _) = state.observe(&snapshot(index, &[ClientStatus::Running]), Utc::now());
            assert!(next.cursor.index() >= previous);
            previous = next.cursor.index();
            state = next;
        }

        assert_eq!(state.cursor.index(), 20);
    }
}

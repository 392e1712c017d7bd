//! Allocation watch
//!
//! The long-running half of the load driver: follows the orchestrator's
//! allocation state through blocking queries and reports placement progress
//! to the status server.

pub mod watcher;

pub use watcher::AllocationWatcher;

//! Repository layer
//!
//! Repositories are thin adapters over the orchestrator and status clients.
//! They provide the narrow interfaces the submitter, the watch loop and the
//! teardown need, without any business logic.
//!
//! All repositories are trait-based so tests can substitute in-memory fakes.

mod allocations;
mod jobs;
mod metrics;

// Re-export traits
pub use allocations::AllocationRepository;
pub use jobs::JobRepository;
pub use metrics::MetricsRepository;

// Re-export implementations
pub use allocations::HttpAllocationRepository;
pub use jobs::HttpJobRepository;
pub use metrics::TcpMetricsRepository;

//! Core domain types
//!
//! These types are shared between the job-spec parser (which produces jobs),
//! the client (which moves allocations over the wire) and the CLI (which
//! drives submission, observation and teardown).

pub mod allocation;
pub mod job;
pub mod metrics;
pub mod watch;

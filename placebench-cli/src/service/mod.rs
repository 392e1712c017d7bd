//! Service layer
//!
//! The one-shot batch operations of the load driver: fanning a job out into
//! many registrations and tearing every job down again. Both stop at the
//! first failure and report how far they got.

mod batch;
mod submitter;
mod teardown;

pub use submitter::JobSubmitter;
pub use teardown::Teardown;

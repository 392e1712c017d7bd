//! Placebench job specifications
//!
//! Job manifests are Lua scripts that return a job table. This crate:
//! - Renders the benchmark manifest from its template
//! - Evaluates manifests in a restricted sandbox
//! - Parses the returned table into a [`JobSpec`]

pub mod parser;
pub mod sandbox;
pub mod template;

pub use parser::{parse_job, parse_job_file};
pub use sandbox::create_sandbox;
pub use template::{JOB_FILE_NAME, render_job_manifest, write_job_manifest};

pub use placebench_core::domain::job::JobSpec;

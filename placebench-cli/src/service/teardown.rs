//! Teardown coordinator
//!
//! Deregisters every job the orchestrator knows about, then removes the
//! local working directory. Any failure stops the teardown so that partial
//! cleanup is visible to the operator.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::repository::JobRepository;
use crate::service::batch::{BatchAbort, BatchAction};

/// Cleans up after a benchmark run
pub struct Teardown<R> {
    jobs: R,
}

impl<R: JobRepository> Teardown<R> {
    pub fn new(jobs: R) -> Self {
        Self { jobs }
    }

    /// Deregisters all jobs and removes `working_dir`
    ///
    /// Returns the number of deregistered jobs.
    pub async fn run(&self, working_dir: &Path) -> Result<usize> {
        let deregistered = self.deregister_all().await?;
        remove_working_dir(working_dir).await?;
        Ok(deregistered)
    }

    /// Deregisters every registered job, stopping at the first failure
    pub async fn deregister_all(&self) -> Result<usize> {
        let job_ids = self.jobs.list().await.context("Failed listing jobs")?;
        let total = job_ids.len();

        info!("Deregistering {} job(s)", total);

        for (index, job_id) in job_ids.into_iter().enumerate() {
            if let Err(source) = self.jobs.deregister(&job_id).await {
                return Err(BatchAbort {
                    action: BatchAction::Deregister,
                    completed: index,
                    total,
                    job_id,
                    source,
                }
                .into());
            }
            debug!("Deregistered {}", job_id);
        }

        Ok(total)
    }
}

/// Recursively removes the working directory
///
/// A directory that no longer exists counts as removed.
pub async fn remove_working_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            info!("Removed working directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Working directory {} already gone", dir.display());
            Ok(())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed cleaning up working directory {}", dir.display()))
        }
    }
}

//! Job fan-out submitter
//!
//! Registers `count` copies of one job, each under its own identifier
//! `job-<i>`. Registration is sequential and ordered by `i` so runs are
//! reproducible.

use placebench_core::dto::job::ApiJob;
use tracing::{debug, info};

use crate::repository::JobRepository;
use crate::service::batch::{BatchAbort, BatchAction};

/// Registrations between two progress log lines
const PROGRESS_EVERY: usize = 100;

/// Identifier of the `index`-th instance
pub fn instance_id(index: usize) -> String {
    format!("job-{}", index)
}

/// Submits job instances to the orchestrator
pub struct JobSubmitter<R> {
    jobs: R,
}

impl<R: JobRepository> JobSubmitter<R> {
    pub fn new(jobs: R) -> Self {
        Self { jobs }
    }

    /// Registers `count` instances of `template`
    ///
    /// Stops at the first failed registration. Instances registered before
    /// the failure stay registered.
    pub async fn submit(&self, template: &ApiJob, count: usize) -> Result<usize, BatchAbort> {
        info!("Registering {} instance(s) of job '{}'", count, template.name);

        for index in 0..count {
            let mut job = template.clone();
            job.id = instance_id(index);

            match self.jobs.register(&job).await {
                Ok(eval_id) => debug!("Registered {} (evaluation {})", job.id, eval_id),
                Err(source) => {
                    return Err(BatchAbort {
                        action: BatchAction::Register,
                        completed: index,
                        total: count,
                        job_id: job.id,
                        source,
                    });
                }
            }

            if (index + 1) % PROGRESS_EVERY == 0 {
                info!("Registered {}/{} jobs", index + 1, count);
            }
        }

        Ok(count)
    }
}

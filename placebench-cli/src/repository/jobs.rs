//! Jobs repository
//!
//! Registration, listing and deregistration of jobs.

use async_trait::async_trait;
use placebench_client::{OrchestratorClient, Result};
use placebench_core::dto::job::ApiJob;

/// Repository trait for job-related operations with the orchestrator
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Registers a job, returning the id of the evaluation it triggered
    async fn register(&self, job: &ApiJob) -> Result<String>;

    /// Lists the ids of all registered jobs
    async fn list(&self) -> Result<Vec<String>>;

    /// Deregisters the job with the given id
    async fn deregister(&self, job_id: &str) -> Result<()>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: OrchestratorClient,
}

impl HttpJobRepository {
    pub fn new(client: OrchestratorClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn register(&self, job: &ApiJob) -> Result<String> {
        let response = self.client.register_job(job).await?;
        Ok(response.eval_id)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let jobs = self.client.list_jobs().await?;
        Ok(jobs.into_iter().map(|stub| stub.id).collect())
    }

    async fn deregister(&self, job_id: &str) -> Result<()> {
        self.client.deregister_job(job_id).await?;
        Ok(())
    }
}

//! Run command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use placebench_client::OrchestratorClient;
use placebench_core::dto::job::ApiJob;
use placebench_jobspec::{JOB_FILE_NAME, parse_job_file};

use crate::config::Config;
use crate::repository::HttpJobRepository;
use crate::service::JobSubmitter;

/// Register `jobs` instances of the manifest found in `dir`
pub async fn handle_run(jobs: u32, dir: &Path, config: &Config) -> Result<()> {
    let api_job = load_api_job(dir)?;

    let client = OrchestratorClient::new(&config.orchestrator_url);
    let submitter = JobSubmitter::new(HttpJobRepository::new(client));

    let submitted = submitter.submit(&api_job, jobs as usize).await?;

    println!(
        "{} {} job(s) with {} allocation(s) each",
        "✓ Registered".green().bold(),
        submitted,
        api_job.task_groups.iter().map(|g| g.count).sum::<u32>()
    );

    Ok(())
}

/// Parse the manifest in `dir` and convert it for submission
fn load_api_job(dir: &Path) -> Result<ApiJob> {
    let job = parse_job_file(&dir.join(JOB_FILE_NAME)).context("Failed parsing job file")?;

    ApiJob::try_from(&job).context("Failed converting job")
}

//! Teardown command handler

use std::path::Path;

use anyhow::Result;
use colored::*;
use placebench_client::OrchestratorClient;

use crate::config::Config;
use crate::repository::HttpJobRepository;
use crate::service::Teardown;

/// Deregister all jobs and remove `dir`
pub async fn handle_teardown(dir: &Path, config: &Config) -> Result<()> {
    let client = OrchestratorClient::new(&config.orchestrator_url);
    let deregistered = Teardown::new(HttpJobRepository::new(client)).run(dir).await?;

    println!(
        "{} {} job(s), removed {}",
        "✓ Deregistered".green().bold(),
        deregistered,
        dir.display().to_string().dimmed()
    );

    Ok(())
}

//! Setup command handler

use std::path::Path;

use anyhow::Result;
use colored::*;
use placebench_jobspec::write_job_manifest;

/// Render the benchmark manifest with `containers` group instances
pub async fn handle_setup(containers: u32, dir: &Path) -> Result<()> {
    let path = write_job_manifest(dir, containers)?;

    println!(
        "{} {} ({} container(s) per job)",
        "✓ Wrote job file".green().bold(),
        path.display().to_string().cyan(),
        containers
    );

    Ok(())
}

//! Benchmark job manifest template

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Name of the generated manifest inside the working directory
pub const JOB_FILE_NAME: &str = "job.lua";

const COUNT_PLACEHOLDER: &str = "${count}";

const JOB_TEMPLATE: &str = r#"-- Generated by placebench setup
return job.define {
    name = "bench",
    datacenters = { "dc1" },

    groups = {
        job.group {
            name = "cache",
            count = ${count},

            restart = {
                mode = "fail",
                attempts = 0,
            },

            tasks = {
                job.task {
                    name = "bench",
                    driver = "docker",

                    config = {
                        image = "redis:latest",
                    },

                    resources = {
                        cpu = 100,
                        memory = 100,
                    },
                },
            },
        },
    },
}
"#;

/// Render the benchmark manifest with `containers` instances of its group
pub fn render_job_manifest(containers: u32) -> String {
    JOB_TEMPLATE.replace(COUNT_PLACEHOLDER, &containers.to_string())
}

/// Render the benchmark manifest into `dir`, returning the file path
pub fn write_job_manifest(dir: &Path, containers: u32) -> Result<PathBuf> {
    let path = dir.join(JOB_FILE_NAME);

    std::fs::write(&path, render_job_manifest(containers))
        .with_context(|| format!("Failed writing job file {}", path.display()))?;

    Ok(path)
}

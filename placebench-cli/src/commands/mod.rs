//! Commands module
//!
//! Defines the four benchmark phases and their handlers.

mod run;
mod setup;
mod status;
mod teardown;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render the benchmark job manifest into the working directory
    Setup {
        /// Instances of the task group in the rendered job
        #[arg(
            long,
            env = "PLACEBENCH_NUM_CONTAINERS",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        containers: u32,

        /// Working directory that receives the manifest
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Register the rendered job with the orchestrator, many times over
    Run {
        /// Number of job instances to register
        #[arg(
            long,
            env = "PLACEBENCH_NUM_JOBS",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        jobs: u32,

        /// Working directory holding the manifest
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Stream placement progress to a status server until interrupted
    Status {
        /// Address of the status server (host:port)
        addr: String,
    },
    /// Deregister every job and remove the working directory
    Teardown {
        /// Working directory to remove
        dir: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Setup { containers, dir } => setup::handle_setup(containers, &dir).await,
        Commands::Run { jobs, dir } => run::handle_run(jobs, &dir, config).await,
        Commands::Status { addr } => status::handle_status(&addr, config).await,
        Commands::Teardown { dir } => teardown::handle_teardown(&dir, config).await,
    }
}

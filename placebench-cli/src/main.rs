//! Placebench
//!
//! Load driver for a cluster workload orchestrator. A benchmark run is four
//! invocations:
//! - `setup`: render the job manifest into a working directory
//! - `run`: register many copies of the job
//! - `status`: stream placed/booting/running counts to a status server
//! - `teardown`: deregister everything and remove the working directory

mod commands;
mod config;
mod repository;
mod service;
#[cfg(test)]
mod testing;
mod watch;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "placebench")]
#[command(about = "Orchestrator placement load driver", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        global = true,
        env = "PLACEBENCH_ORCHESTRATOR_URL",
        default_value = "http://127.0.0.1:4646"
    )]
    orchestrator_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placebench=info,placebench_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.orchestrator_url,
    };

    handle_command(cli.command, &config).await
}

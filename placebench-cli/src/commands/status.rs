//! Status command handler

use anyhow::{Context, Result};
use placebench_client::OrchestratorClient;
use tracing::{info, warn};

use crate::config::{Config, WatchConfig};
use crate::repository::{HttpAllocationRepository, TcpMetricsRepository};
use crate::watch::AllocationWatcher;

/// Watch allocations and report to the status server at `addr`
///
/// Only returns on a setup failure or a shutdown signal.
pub async fn handle_status(addr: &str, config: &Config) -> Result<()> {
    let watch_config = WatchConfig::from_env()?;
    watch_config.validate()?;

    let http = reqwest::Client::builder()
        .timeout(watch_config.request_timeout())
        .build()
        .context("Failed creating orchestrator client")?;
    let client = OrchestratorClient::with_client(&config.orchestrator_url, http);

    let metrics = TcpMetricsRepository::connect(addr)
        .await
        .context("Failed contacting status server")?;

    let mut watcher =
        AllocationWatcher::new(HttpAllocationRepository::new(client), metrics, watch_config);

    tokio::select! {
        _ = watcher.run() => {},
        _ = shutdown_signal() => {},
    }

    watcher.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping allocation watch");
}

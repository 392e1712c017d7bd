//! Metrics repository
//!
//! Delivers metric samples to the status server.

use async_trait::async_trait;
use placebench_client::{SinkError, StatusClient};
use placebench_core::domain::metrics::MetricSample;
use tracing::{debug, info};

/// Repository trait for publishing metric samples
#[async_trait]
pub trait MetricsRepository: Send {
    /// Publishes one sample
    async fn publish(&mut self, sample: &MetricSample) -> Result<(), SinkError>;

    /// Flushes and releases the connection; later publishes are no-ops
    async fn close(&mut self) -> Result<(), SinkError>;
}

/// TCP implementation of MetricsRepository
pub struct TcpMetricsRepository {
    client: Option<StatusClient>,
}

impl TcpMetricsRepository {
    /// Connects to the status server at `addr`
    pub async fn connect(addr: &str) -> Result<Self, SinkError> {
        let client = StatusClient::connect(addr).await?;
        info!("Reporting metrics to status server at {}", client.addr());
        Ok(Self {
            client: Some(client),
        })
    }
}

#[async_trait]
impl MetricsRepository for TcpMetricsRepository {
    async fn publish(&mut self, sample: &MetricSample) -> Result<(), SinkError> {
        match self.client.as_mut() {
            Some(client) => {
                client
                    .set(sample.metric.as_str(), sample.value as f64, sample.timestamp)
                    .await
            }
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        match self.client.take() {
            Some(client) => {
                debug!("Closing status server connection to {}", client.addr());
                client.close().await
            }
            None => Ok(()),
        }
    }
}

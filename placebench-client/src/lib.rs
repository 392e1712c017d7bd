//! Placebench clients
//!
//! Type-safe clients for the two services the load driver talks to:
//! - [`OrchestratorClient`]: the orchestrator's HTTP API (jobs and allocations)
//! - [`StatusClient`]: the metrics sink, a line-oriented TCP endpoint
//!
//! # Example
//!
//! ```no_run
//! use placebench_client::{OrchestratorClient, QueryOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OrchestratorClient::new("http://127.0.0.1:4646");
//!
//!     let snapshot = client.list_allocations(&QueryOptions::blocking(1)).await?;
//!     println!("{} allocations at index {}", snapshot.allocations.len(), snapshot.last_index);
//!     Ok(())
//! }
//! ```

mod allocations;
pub mod error;
mod jobs;
mod status;

pub use allocations::{INDEX_HEADER, QueryOptions};
pub use error::{ClientError, Result, SinkError};
pub use status::StatusClient;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the orchestrator API
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://127.0.0.1:4646")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// The underlying HTTP client has no request timeout, so blocking queries
    /// are bounded by the server's wait time only.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use placebench_client::OrchestratorClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(330))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = OrchestratorClient::with_client("http://127.0.0.1:4646", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request URL from the base URL and percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-success status into an [`ClientError::ApiError`]
    async fn ensure_success(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

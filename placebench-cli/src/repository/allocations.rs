//! Allocations repository

use async_trait::async_trait;
use placebench_client::{OrchestratorClient, QueryOptions, Result};
use placebench_core::domain::allocation::AllocationSnapshot;

/// Repository trait for reading allocation state
#[async_trait]
pub trait AllocationRepository: Send + Sync {
    /// Lists all allocations, blocking per `options`
    async fn list(&self, options: &QueryOptions) -> Result<AllocationSnapshot>;
}

/// HTTP implementation of AllocationRepository
pub struct HttpAllocationRepository {
    client: OrchestratorClient,
}

impl HttpAllocationRepository {
    pub fn new(client: OrchestratorClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AllocationRepository for HttpAllocationRepository {
    async fn list(&self, options: &QueryOptions) -> Result<AllocationSnapshot> {
        self.client.list_allocations(options).await
    }
}

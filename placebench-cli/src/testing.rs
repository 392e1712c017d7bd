//! In-memory repository fakes for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use placebench_client::{ClientError, QueryOptions, Result, SinkError};
use placebench_core::domain::allocation::{Allocation, AllocationSnapshot, ClientStatus};
use placebench_core::domain::metrics::MetricSample;
use placebench_core::dto::job::{ApiJob, ApiResources, ApiTask, ApiTaskGroup};

use crate::repository::{AllocationRepository, JobRepository, MetricsRepository};

pub fn api_job(id: &str) -> ApiJob {
    ApiJob {
        id: id.to_string(),
        name: "bench".to_string(),
        job_type: "service".to_string(),
        priority: 50,
        datacenters: vec!["dc1".to_string()],
        task_groups: vec![ApiTaskGroup {
            name: "cache".to_string(),
            count: 2,
            restart_policy: None,
            tasks: vec![ApiTask {
                name: "bench".to_string(),
                driver: "docker".to_string(),
                config: serde_json::Map::new(),
                env: Default::default(),
                resources: ApiResources {
                    cpu: 100,
                    memory_mb: 100,
                },
            }],
        }],
    }
}

#[derive(Default)]
struct JobState {
    listed: Vec<String>,
    registered: Vec<ApiJob>,
    deregistered: Vec<String>,
    fail_register_on: Option<String>,
    fail_deregister_on: Option<String>,
    fail_list: bool,
}

/// Records every call; can be told to fail on a specific job
#[derive(Clone, Default)]
pub struct FakeJobRepository {
    state: Arc<Mutex<JobState>>,
}

impl FakeJobRepository {
    pub fn with_jobs(ids: &[&str]) -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().listed = ids.iter().map(|s| s.to_string()).collect();
        repo
    }

    pub fn failing_register_on(self, job_id: &str) -> Self {
        self.state.lock().unwrap().fail_register_on = Some(job_id.to_string());
        self
    }

    pub fn failing_deregister_on(self, job_id: &str) -> Self {
        self.state.lock().unwrap().fail_deregister_on = Some(job_id.to_string());
        self
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered_jobs().into_iter().map(|j| j.id).collect()
    }

    pub fn registered_jobs(&self) -> Vec<ApiJob> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn deregistered(&self) -> Vec<String> {
        self.state.lock().unwrap().deregistered.clone()
    }
}

#[async_trait]
impl JobRepository for FakeJobRepository {
    async fn register(&self, job: &ApiJob) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.fail_register_on.as_deref() == Some(job.id.as_str()) {
            return Err(ClientError::api_error(500, "registration rejected"));
        }
        state.registered.push(job.clone());
        Ok(format!("eval-{}", job.id))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(ClientError::api_error(500, "no leader"));
        }
        Ok(state.listed.clone())
    }

    async fn deregister(&self, job_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deregister_on.as_deref() == Some(job_id) {
            return Err(ClientError::api_error(500, "deregistration rejected"));
        }
        state.deregistered.push(job_id.to_string());
        Ok(())
    }
}

/// Builds a snapshot with one allocation per status
pub fn snapshot(last_index: u64, statuses: &[ClientStatus]) -> AllocationSnapshot {
    AllocationSnapshot {
        allocations: statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Allocation {
                id: format!("alloc-{}", i),
                job_id: format!("job-{}", i),
                task_group: "cache".to_string(),
                client_status: *status,
            })
            .collect(),
        last_index,
    }
}

/// Replays scripted query results and records the options of every query
#[derive(Clone, Default)]
pub struct ScriptedAllocations {
    responses: Arc<Mutex<VecDeque<Result<AllocationSnapshot>>>>,
    queries: Arc<Mutex<Vec<QueryOptions>>>,
}

impl ScriptedAllocations {
    pub fn new(responses: Vec<Result<AllocationSnapshot>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            queries: Arc::default(),
        }
    }

    pub fn queries(&self) -> Vec<QueryOptions> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AllocationRepository for ScriptedAllocations {
    async fn list(&self, options: &QueryOptions) -> Result<AllocationSnapshot> {
        self.queries.lock().unwrap().push(*options);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::ParseError("script exhausted".to_string())))
    }
}

/// Collects published samples
#[derive(Clone, Default)]
pub struct RecordingMetrics {
    samples: Arc<Mutex<Vec<MetricSample>>>,
    fail_writes: bool,
    closed: Arc<Mutex<bool>>,
}

impl RecordingMetrics {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl MetricsRepository for RecordingMetrics {
    async fn publish(&mut self, sample: &MetricSample) -> std::result::Result<(), SinkError> {
        self.samples.lock().unwrap().push(sample.clone());
        if self.fail_writes {
            return Err(SinkError::Write(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        Ok(())
    }

    async fn close(&mut self) -> std::result::Result<(), SinkError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

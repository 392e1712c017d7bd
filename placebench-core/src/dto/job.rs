//! Job DTOs for the orchestrator's job endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A job in the orchestrator's submission schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiJob {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub job_type: String,
    pub priority: i32,
    pub datacenters: Vec<String>,
    pub task_groups: Vec<ApiTaskGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiTaskGroup {
    pub name: String,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<ApiRestartPolicy>,
    pub tasks: Vec<ApiTask>,
}

/// Restart policy; durations are nanoseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiRestartPolicy {
    pub mode: String,
    pub attempts: u32,
    pub interval: i64,
    pub delay: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiTask {
    pub name: String,
    pub driver: String,
    pub config: serde_json::Map<String, serde_json::Value>,
    pub env: BTreeMap<String, String>,
    pub resources: ApiResources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResources {
    #[serde(rename = "CPU")]
    pub cpu: u32,
    #[serde(rename = "MemoryMB")]
    pub memory_mb: u32,
}

/// Body of a job registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterJobRequest {
    #[serde(rename = "Job")]
    pub job: ApiJob,
}

/// Response to a job registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterJobResponse {
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,
    #[serde(default)]
    pub job_modify_index: u64,
}

/// Entry of the job listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobListStub {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub job_type: String,
    #[serde(default)]
    pub status: String,
}

/// Response to a job deregistration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeregisterJobResponse {
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,
}

//! Job domain types
//!
//! The structured form of a job manifest as produced by the job-spec parser.
//! It is intentionally looser than the wire schema (signed integers, native
//! durations, a dynamic config tree); see [`crate::convert`] for the mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A parsed job definition
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// Identifier the job is registered under; defaults to the name
    pub id: String,
    pub name: String,
    pub job_type: JobType,
    pub datacenters: Vec<String>,
    pub priority: i64,
    pub groups: Vec<TaskGroupSpec>,
}

impl JobSpec {
    /// Returns a copy of this job addressed by `id`
    ///
    /// Used by the fan-out submitter: every instance shares the body of the
    /// template but is tracked by the orchestrator under its own identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Total number of task group instances this job asks for
    pub fn total_count(&self) -> i64 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// Scheduler type of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobType {
    #[default]
    Service,
    Batch,
    System,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Service => "service",
            JobType::Batch => "batch",
            JobType::System => "system",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(JobType::Service),
            "batch" => Ok(JobType::Batch),
            "system" => Ok(JobType::System),
            other => Err(format!("unknown job type '{}'", other)),
        }
    }
}

/// A group of tasks scheduled together, `count` times
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroupSpec {
    pub name: String,
    pub count: i64,
    pub restart: Option<RestartPolicy>,
    pub tasks: Vec<TaskSpec>,
}

/// What the orchestrator does when a task exits
#[derive(Debug, Clone, PartialEq)]
pub struct RestartPolicy {
    pub mode: RestartMode,
    pub attempts: i64,
    pub interval: Duration,
    pub delay: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            mode: RestartMode::Fail,
            attempts: 0,
            interval: Duration::from_secs(1800),
            delay: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartMode {
    /// Give up once attempts are exhausted
    Fail,
    /// Wait for the next interval once attempts are exhausted
    Delay,
}

impl RestartMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartMode::Fail => "fail",
            RestartMode::Delay => "delay",
        }
    }
}

impl std::str::FromStr for RestartMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(RestartMode::Fail),
            "delay" => Ok(RestartMode::Delay),
            other => Err(format!("unknown restart mode '{}'", other)),
        }
    }
}

/// A single task inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub driver: String,
    /// Driver-specific configuration block
    pub config: BTreeMap<String, ConfigValue>,
    pub env: BTreeMap<String, String>,
    pub resources: Resources,
}

/// Resource ask of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resources {
    /// CPU in MHz
    pub cpu: i64,
    pub memory_mb: i64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            cpu: 100,
            memory_mb: 300,
        }
    }
}

/// A value inside a driver config block
///
/// Driver configuration is free-form: nested lists and maps of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

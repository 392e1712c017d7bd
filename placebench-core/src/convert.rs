//! Parsed job to wire job conversion
//!
//! An explicit field-by-field mapping from [`JobSpec`] into [`ApiJob`]. Every
//! narrowing conversion is checked; a value the wire schema cannot carry is a
//! [`TranscodeError`] naming the field, and no partial job is ever returned.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::job::{ConfigValue, JobSpec, Resources, RestartPolicy, TaskGroupSpec, TaskSpec};
use crate::dto::job::{ApiJob, ApiResources, ApiRestartPolicy, ApiTask, ApiTaskGroup};

/// Errors raised while converting a job into its wire form
#[derive(Debug, Error, PartialEq)]
pub enum TranscodeError {
    /// Integer that does not fit the wire field
    #[error("field '{field}' has value {value}, which is out of range for the submission schema")]
    OutOfRange { field: String, value: i64 },

    /// NaN or infinity inside a config block
    #[error("config value at '{path}' is not a finite number")]
    NonFiniteNumber { path: String },

    /// Duration too long to express in nanoseconds
    #[error("duration field '{field}' overflows the submission schema")]
    DurationOverflow { field: String },
}

impl TryFrom<&JobSpec> for ApiJob {
    type Error = TranscodeError;

    fn try_from(job: &JobSpec) -> Result<Self, Self::Error> {
        transcode_job(job)
    }
}

/// Converts a parsed job into the orchestrator's submission schema
pub fn transcode_job(job: &JobSpec) -> Result<ApiJob, TranscodeError> {
    let task_groups = job
        .groups
        .iter()
        .enumerate()
        .map(|(i, group)| transcode_group(group, &format!("groups[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiJob {
        id: job.id.clone(),
        name: job.name.clone(),
        job_type: job.job_type.as_str().to_string(),
        priority: narrow(job.priority, "priority")?,
        datacenters: job.datacenters.clone(),
        task_groups,
    })
}

fn transcode_group(group: &TaskGroupSpec, path: &str) -> Result<ApiTaskGroup, TranscodeError> {
    let restart_policy = group
        .restart
        .as_ref()
        .map(|policy| transcode_restart(policy, &format!("{}.restart", path)))
        .transpose()?;

    let tasks = group
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| transcode_task(task, &format!("{}.tasks[{}]", path, i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiTaskGroup {
        name: group.name.clone(),
        count: narrow(group.count, &format!("{}.count", path))?,
        restart_policy,
        tasks,
    })
}

fn transcode_restart(policy: &RestartPolicy, path: &str) -> Result<ApiRestartPolicy, TranscodeError> {
    Ok(ApiRestartPolicy {
        mode: policy.mode.as_str().to_string(),
        attempts: narrow(policy.attempts, &format!("{}.attempts", path))?,
        interval: nanos(policy.interval, &format!("{}.interval", path))?,
        delay: nanos(policy.delay, &format!("{}.delay", path))?,
    })
}

fn transcode_task(task: &TaskSpec, path: &str) -> Result<ApiTask, TranscodeError> {
    Ok(ApiTask {
        name: task.name.clone(),
        driver: task.driver.clone(),
        config: transcode_config(&task.config, &format!("{}.config", path))?,
        env: task.env.clone(),
        resources: transcode_resources(&task.resources, &format!("{}.resources", path))?,
    })
}

fn transcode_resources(resources: &Resources, path: &str) -> Result<ApiResources, TranscodeError> {
    Ok(ApiResources {
        cpu: narrow(resources.cpu, &format!("{}.cpu", path))?,
        memory_mb: narrow(resources.memory_mb, &format!("{}.memory", path))?,
    })
}

fn transcode_config(
    config: &BTreeMap<String, ConfigValue>,
    path: &str,
) -> Result<Map<String, Value>, TranscodeError> {
    let mut out = Map::new();
    for (key, value) in config {
        out.insert(
            key.clone(),
            transcode_value(value, &format!("{}.{}", path, key))?,
        );
    }
    Ok(out)
}

fn transcode_value(value: &ConfigValue, path: &str) -> Result<Value, TranscodeError> {
    Ok(match value {
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Integer(i) => Value::Number(Number::from(*i)),
        ConfigValue::Number(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| TranscodeError::NonFiniteNumber {
                path: path.to_string(),
            })?,
        ConfigValue::String(s) => Value::String(s.clone()),
        ConfigValue::List(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| transcode_value(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        ConfigValue::Map(map) => Value::Object(transcode_config(map, path)?),
    })
}

fn narrow<T: TryFrom<i64>>(value: i64, field: &str) -> Result<T, TranscodeError> {
    T::try_from(value).map_err(|_| TranscodeError::OutOfRange {
        field: field.to_string(),
        value,
    })
}

fn nanos(duration: Duration, field: &str) -> Result<i64, TranscodeError> {
    i64::try_from(duration.as_nanos()).map_err(|_| TranscodeError::DurationOverflow {
        field: field.to_string(),
    })
}

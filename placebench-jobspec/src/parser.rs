//! Job manifest parser
//!
//! Evaluates a Lua job manifest in the sandbox and converts the returned
//! table into a [`JobSpec`]. Missing required fields and mistyped values are
//! reported with the name of the offending field.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use mlua::{Table, Value};
use placebench_core::domain::job::{
    ConfigValue, JobSpec, JobType, Resources, RestartMode, RestartPolicy, TaskGroupSpec, TaskSpec,
};

use crate::sandbox::create_sandbox;

const DEFAULT_PRIORITY: i64 = 50;
const MAX_CONFIG_DEPTH: usize = 32;

/// Parse a job manifest from Lua source code
///
/// # Errors
/// Returns an error if:
/// - The Lua source is invalid or does not return a table
/// - Required fields are missing (name, datacenters, groups, tasks, driver)
/// - Field types are incorrect
///
/// # Example
/// ```no_run
/// use placebench_jobspec::parse_job;
///
/// let job = parse_job(r#"
///     return job.define {
///         name = "bench",
///         datacenters = { "dc1" },
///         groups = {
///             job.group {
///                 name = "cache",
///                 count = 2,
///                 tasks = { job.task { name = "redis", driver = "docker" } },
///             },
///         },
///     }
/// "#)?;
/// assert_eq!(job.groups[0].count, 2);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_job(source: &str) -> Result<JobSpec> {
    let lua = create_sandbox().context("Failed to create manifest sandbox")?;

    let job: Table = lua
        .load(source)
        .eval()
        .context("Failed to evaluate job manifest")?;

    let name: String = job
        .get::<Option<String>>("name")
        .context("Field 'name' must be a string")?
        .ok_or_else(|| anyhow!("Job must have a 'name' field"))?;

    let job_type = match job
        .get::<Option<String>>("type")
        .context("Field 'type' must be a string")?
    {
        Some(raw) => raw.parse::<JobType>().map_err(|e| anyhow!(e))?,
        None => JobType::default(),
    };

    let priority = job
        .get::<Option<i64>>("priority")
        .context("Field 'priority' must be an integer")?
        .unwrap_or(DEFAULT_PRIORITY);

    let datacenters = parse_string_list(&job, "datacenters")?;
    if datacenters.is_empty() {
        bail!("Job must list at least one datacenter");
    }

    let groups = parse_groups(&job)?;

    Ok(JobSpec {
        id: name.clone(),
        name,
        job_type,
        datacenters,
        priority,
        groups,
    })
}

/// Read and parse a job manifest file
pub fn parse_job_file(path: &Path) -> Result<JobSpec> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {}", path.display()))?;

    parse_job(&source).with_context(|| format!("Failed to parse job file {}", path.display()))
}

fn parse_string_list(table: &Table, field: &str) -> Result<Vec<String>> {
    let value: Value = table.get(field)?;

    match value {
        Value::Nil => Ok(Vec::new()),
        Value::Table(list) => list
            .sequence_values::<String>()
            .map(|entry| entry.with_context(|| format!("Failed to read '{}' entry", field)))
            .collect(),
        _ => Err(anyhow!("Field '{}' must be an array of strings", field)),
    }
}

fn parse_groups(job: &Table) -> Result<Vec<TaskGroupSpec>> {
    let groups_table: Table = job
        .get::<Option<Table>>("groups")
        .context("Field 'groups' must be an array of groups")?
        .ok_or_else(|| anyhow!("Job must have a 'groups' field"))?;

    let mut groups = Vec::new();

    for (i, entry) in groups_table.sequence_values::<Table>().enumerate() {
        let group = entry.with_context(|| format!("Failed to read group #{}", i + 1))?;
        groups.push(parse_group(&group, i)?);
    }

    if groups.is_empty() {
        bail!("Job must have at least one group");
    }

    Ok(groups)
}

fn parse_group(group: &Table, index: usize) -> Result<TaskGroupSpec> {
    let name: String = group
        .get::<Option<String>>("name")?
        .ok_or_else(|| anyhow!("Group #{} must have a 'name' field", index + 1))?;

    let count = group
        .get::<Option<i64>>("count")
        .with_context(|| format!("Group '{}': 'count' must be an integer", name))?
        .unwrap_or(1);

    let restart = match group.get::<Option<Table>>("restart")? {
        Some(table) => Some(
            parse_restart(&table).with_context(|| format!("Group '{}': invalid restart block", name))?,
        ),
        None => None,
    };

    let tasks_table: Table = group
        .get::<Option<Table>>("tasks")?
        .ok_or_else(|| anyhow!("Group '{}' must have a 'tasks' field", name))?;

    let mut tasks = Vec::new();
    for entry in tasks_table.sequence_values::<Table>() {
        let task = entry.with_context(|| format!("Group '{}': failed to read task", name))?;
        tasks.push(parse_task(&task).with_context(|| format!("Group '{}'", name))?);
    }

    if tasks.is_empty() {
        bail!("Group '{}' must have at least one task", name);
    }

    Ok(TaskGroupSpec {
        name,
        count,
        restart,
        tasks,
    })
}

fn parse_restart(table: &Table) -> Result<RestartPolicy> {
    let mut policy = RestartPolicy::default();

    if let Some(mode) = table.get::<Option<String>>("mode")? {
        policy.mode = mode.parse::<RestartMode>().map_err(|e| anyhow!(e))?;
    }
    if let Some(attempts) = table
        .get::<Option<i64>>("attempts")
        .context("'attempts' must be an integer")?
    {
        policy.attempts = attempts;
    }
    if let Some(interval) = parse_duration(table.get("interval")?, "interval")? {
        policy.interval = interval;
    }
    if let Some(delay) = parse_duration(table.get("delay")?, "delay")? {
        policy.delay = delay;
    }

    Ok(policy)
}

fn parse_task(task: &Table) -> Result<TaskSpec> {
    let name: String = task
        .get::<Option<String>>("name")?
        .ok_or_else(|| anyhow!("Task must have a 'name' field"))?;

    let driver: String = task
        .get::<Option<String>>("driver")?
        .ok_or_else(|| anyhow!("Task '{}' must have a 'driver' field", name))?;

    let config = match task.get::<Value>("config")? {
        Value::Nil => BTreeMap::new(),
        Value::Table(table) => match parse_config_table(&table, "config", 0)? {
            ConfigValue::Map(map) => map,
            _ => bail!("Task '{}': 'config' must be a table of named values", name),
        },
        _ => bail!("Task '{}': 'config' must be a table", name),
    };

    let env = match task.get::<Option<Table>>("env")? {
        Some(table) => table
            .pairs::<String, String>()
            .collect::<mlua::Result<BTreeMap<_, _>>>()
            .with_context(|| format!("Task '{}': 'env' must map strings to strings", name))?,
        None => BTreeMap::new(),
    };

    let mut resources = Resources::default();
    if let Some(table) = task.get::<Option<Table>>("resources")? {
        if let Some(cpu) = table.get::<Option<i64>>("cpu")? {
            resources.cpu = cpu;
        }
        if let Some(memory) = table.get::<Option<i64>>("memory")? {
            resources.memory_mb = memory;
        }
    }

    Ok(TaskSpec {
        name,
        driver,
        config,
        env,
        resources,
    })
}

/// Converts a Lua table into a config value
///
/// Tables whose keys are exactly `1..n` become lists; everything else must be
/// keyed by strings and becomes a map. Nesting deeper than `MAX_CONFIG_DEPTH`
/// is rejected, which also catches tables that reference themselves.
fn parse_config_table(table: &Table, path: &str, depth: usize) -> Result<ConfigValue> {
    if depth > MAX_CONFIG_DEPTH {
        bail!(
            "'{}' is nested deeper than {} levels",
            path,
            MAX_CONFIG_DEPTH
        );
    }

    let entries = table
        .clone()
        .pairs::<Value, Value>()
        .collect::<mlua::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read '{}'", path))?;

    let len = table.raw_len();
    if len > 0 && len == entries.len() {
        let mut items = Vec::with_capacity(len);
        for (i, item) in table.clone().sequence_values::<Value>().enumerate() {
            let item = item.with_context(|| format!("Failed to read '{}[{}]'", path, i))?;
            items.push(parse_config_value(item, &format!("{}[{}]", path, i), depth)?);
        }
        return Ok(ConfigValue::List(items));
    }

    let mut map = BTreeMap::new();
    for (key, value) in entries {
        let key = match key {
            Value::String(s) => s.to_string_lossy(),
            other => bail!(
                "Keys of '{}' must be strings, found {}",
                path,
                other.type_name()
            ),
        };
        let child = format!("{}.{}", path, key);
        map.insert(key, parse_config_value(value, &child, depth)?);
    }

    Ok(ConfigValue::Map(map))
}

fn parse_config_value(value: Value, path: &str, depth: usize) -> Result<ConfigValue> {
    match value {
        Value::Boolean(b) => Ok(ConfigValue::Bool(b)),
        Value::Integer(i) => Ok(ConfigValue::Integer(i)),
        Value::Number(n) => Ok(ConfigValue::Number(n)),
        Value::String(s) => Ok(ConfigValue::String(s.to_string_lossy())),
        Value::Table(t) => parse_config_table(&t, path, depth + 1),
        other => bail!(
            "Unsupported {} value at '{}'",
            other.type_name(),
            path
        ),
    }
}

/// Durations are integer seconds or strings like `"250ms"`, `"30s"`, `"5m"`, `"1h"`
fn parse_duration(value: Value, field: &str) -> Result<Option<Duration>> {
    match value {
        Value::Nil => Ok(None),
        Value::Integer(secs) if secs >= 0 => Ok(Some(Duration::from_secs(secs as u64))),
        Value::String(s) => parse_duration_str(&s.to_string_lossy())
            .map(Some)
            .with_context(|| format!("Invalid duration for '{}'", field)),
        _ => Err(anyhow!(
            "'{}' must be a non-negative number of seconds or a duration string",
            field
        )),
    }
}

fn parse_duration_str(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| anyhow!("missing unit in '{}'", raw))?;
    let (digits, unit) = raw.split_at(split);
    let amount: u64 = digits
        .parse()
        .with_context(|| format!("missing amount in '{}'", raw))?;

    let secs = |factor: u64| {
        amount
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| anyhow!("duration out of range: '{}'", raw))
    };

    match unit {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => secs(60),
        "h" => secs(3600),
        other => bail!("unknown unit '{}'", other),
    }
}

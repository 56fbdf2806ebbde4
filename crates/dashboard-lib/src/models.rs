//! Core data models for the container dashboard

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::cost::CostEstimate;
use crate::optimizer::{Action, Priority};

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
pub fn to_iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// serde `serialize_with` helper for `to_iso8601`
pub fn serialize_iso8601<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso8601(ts))
}

/// Lifecycle state reported by the container runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    /// Any state string the runtime reports that is not listed above
    Other(String),
}

impl ContainerState {
    pub fn as_str(&self) -> &str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Other(s) => s.as_str(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

impl From<&str> for ContainerState {
    fn from(value: &str) -> Self {
        match value {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            other => ContainerState::Other(other.to_string()),
        }
    }
}

impl From<String> for ContainerState {
    fn from(value: String) -> Self {
        ContainerState::from(value.as_str())
    }
}

impl From<ContainerState> for String {
    fn from(value: ContainerState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container metadata as reported by the runtime listing or inspect call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    /// Name without the runtime's leading `/`
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    pub created: DateTime<Utc>,
}

/// Point-in-time resource counters for one container
///
/// Docker reports both the current sample and the previous one
/// (`precpu_stats`) in a single stats response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCounters {
    pub cpu_total_usage: u64,
    pub previous_cpu_total_usage: u64,
    pub system_cpu_usage: u64,
    pub previous_system_cpu_usage: u64,
    pub online_cpus: u64,
    pub memory_usage: u64,
    pub memory_limit: u64,
}

/// Normalized usage of one container, both values rounded to 2 decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu: f64,
    pub memory: f64,
}

/// A container with its live (or zeroed) usage, built fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: String,
    pub name: String,
    pub status: ContainerState,
    /// CPU usage in percent of one core times online cores
    pub cpu: f64,
    /// Memory usage in percent of the container's limit
    pub memory: f64,
    pub created: DateTime<Utc>,
    pub image: String,
}

impl ContainerSnapshot {
    pub fn new(info: ContainerInfo, usage: ResourceUsage) -> Self {
        Self {
            id: info.id,
            name: info.name,
            status: info.state,
            cpu: usage.cpu,
            memory: usage.memory,
            created: info.created,
            image: info.image,
        }
    }

    /// Snapshot for a container that is not running; its counters are not queried
    pub fn idle(info: ContainerInfo) -> Self {
        Self::new(info, ResourceUsage::default())
    }

    pub fn usage(&self) -> ResourceUsage {
        ResourceUsage {
            cpu: self.cpu,
            memory: self.memory,
        }
    }
}

/// A running container flagged by the optimization classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleContainer {
    #[serde(flatten)]
    pub snapshot: ContainerSnapshot,
    pub is_idle: bool,
    pub reason: String,
    pub action: Action,
    pub priority: Priority,
}

/// Recommendation to stop a container, with the savings that would yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub container_id: String,
    pub container_name: String,
    pub action: Action,
    pub reason: String,
    pub priority: Priority,
    pub estimated_savings: CostEstimate,
    pub current_usage: ResourceUsage,
}

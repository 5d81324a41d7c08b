// Per-container snapshot models

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt;

/// Length of the short container id shown in the table (same as `docker ps`).
pub const SHORT_ID_LEN: usize = 12;

/// Docker container lifecycle state; serializes to lowercase JSON (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerState {
    /// Parse from Docker API state string (e.g. "running", "exited").
    pub fn from_docker(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        *self == ContainerState::Running
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a container is, as reported by the list call of one polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerIdentity {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    /// Human status text, e.g. "Up 3 hours".
    pub status: String,
    /// Creation time as unix seconds (0 when unknown).
    pub created: i64,
}

impl ContainerIdentity {
    pub fn created_at(&self) -> Option<DateTime<Local>> {
        if self.created <= 0 {
            return None;
        }
        Local.timestamp_opt(self.created, 0).single()
    }
}

/// Truncate a runtime id to its short display form.
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Pick the display name: first alias wins, leading '/' stripped.
/// Falls back to the short id when the runtime reports no names.
pub fn display_name(names: &[String], id: &str) -> String {
    match names.first() {
        Some(n) if !n.trim_start_matches('/').is_empty() => n.trim_start_matches('/').to_string(),
        _ => short_id(id),
    }
}

/// Derived resource metrics for one container in one cycle. Zero means
/// "unknown or unavailable" for every field; see the collector for when
/// fields are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetrics {
    pub cpu_percent: f64,
    /// Configured CPU limit in cores; 0 means unlimited.
    pub cpu_limit: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub memory_percent: f64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub block_read_bytes: u64,
    pub block_write_bytes: u64,
    pub pids: u64,
    pub container_size_bytes: u64,
    pub image_size_bytes: u64,
}

impl ResourceMetrics {
    pub fn network_total(&self) -> u64 {
        self.network_rx_bytes.saturating_add(self.network_tx_bytes)
    }

    pub fn block_total(&self) -> u64 {
        self.block_read_bytes.saturating_add(self.block_write_bytes)
    }
}

/// One row of the table: identity plus metrics captured in the same cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    #[serde(flatten)]
    pub identity: ContainerIdentity,
    pub metrics: ResourceMetrics,
}

impl ContainerSnapshot {
    pub fn name(&self) -> &str {
        &self.identity.name
    }
}

// Docker daemon summary model

use serde::Serialize;

/// Aggregate daemon information shown in the summary bar. Fetched
/// independently of the container table; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSummary {
    pub server_version: String,
    pub containers_total: u64,
    pub containers_running: u64,
    pub containers_paused: u64,
    pub containers_stopped: u64,
    pub images_total: u64,
    pub total_image_size_bytes: u64,
    pub cpus: u64,
    pub memory_total_bytes: u64,
    pub os_type: String,
    pub architecture: String,
}

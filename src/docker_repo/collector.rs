// One polling cycle: list containers, then fan out one task per container.
// Only the list call can fail the cycle; every per-container call degrades
// to zeroed fields instead.

use super::{ContainerEntry, RuntimeClient, RuntimeError, stats};
use crate::models::{
    ContainerIdentity, ContainerSnapshot, ContainerState, DaemonSummary, ResourceMetrics,
    display_name, short_id,
};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to list containers: {0}")]
    ListContainers(#[source] RuntimeError),
}

pub struct Collector {
    client: Arc<dyn RuntimeClient>,
}

impl Collector {
    pub fn new(client: Arc<dyn RuntimeClient>) -> Self {
        Self { client }
    }

    /// Run one collect cycle. Blocks until every per-container task has
    /// finished or the deadline passed. Rows come back in list order, one per
    /// listed container.
    pub async fn collect(
        &self,
        include_stopped: bool,
        deadline: Instant,
    ) -> Result<Vec<ContainerSnapshot>, CollectError> {
        let entries = within(
            deadline,
            "list_containers",
            self.client.list_containers(include_stopped, true),
        )
        .await
        .map_err(CollectError::ListContainers)?;

        // Rows for tasks that die before returning: identity plus zeroed metrics.
        let fallbacks: Vec<ContainerSnapshot> = entries.iter().map(base_snapshot).collect();

        let mut tasks = JoinSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let client = self.client.clone();
            tasks.spawn(async move { (index, collect_one(client, entry, deadline).await) });
        }

        // Dropping `tasks` (e.g. when the caller abandons this future) aborts
        // whatever is still running.
        let mut finished: Vec<Option<ContainerSnapshot>> = vec![None; fallbacks.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, snapshot)) => finished[index] = Some(snapshot),
                Err(e) => warn!(
                    error = %e,
                    operation = "collect_container",
                    "container task failed; keeping identity only"
                ),
            }
        }
        Ok(finished
            .into_iter()
            .zip(fallbacks)
            .map(|(done, fallback)| done.unwrap_or(fallback))
            .collect())
    }

    /// Daemon-wide summary: info plus total image size. Independent of `collect`.
    pub async fn daemon_summary(&self, deadline: Instant) -> Result<DaemonSummary, RuntimeError> {
        let (info, images) = tokio::try_join!(
            within(deadline, "daemon_info", self.client.daemon_info()),
            within(deadline, "list_images", self.client.list_images()),
        )?;
        let total_image_size_bytes = images
            .iter()
            .map(|img| non_negative(img.size))
            .fold(0u64, u64::saturating_add);
        Ok(DaemonSummary {
            server_version: info.server_version,
            containers_total: non_negative(info.containers),
            containers_running: non_negative(info.containers_running),
            containers_paused: non_negative(info.containers_paused),
            containers_stopped: non_negative(info.containers_stopped),
            images_total: images.len() as u64,
            total_image_size_bytes,
            cpus: non_negative(info.ncpu),
            memory_total_bytes: non_negative(info.mem_total),
            os_type: info.os_type,
            architecture: info.architecture,
        })
    }
}

/// Identity from the list entry with every live metric at zero.
fn base_snapshot(entry: &ContainerEntry) -> ContainerSnapshot {
    ContainerSnapshot {
        identity: ContainerIdentity {
            id: short_id(&entry.id),
            name: display_name(&entry.names, &entry.id),
            image: entry.image.clone(),
            state: ContainerState::from_docker(&entry.state),
            status: entry.status.clone(),
            created: entry.created,
        },
        metrics: ResourceMetrics {
            container_size_bytes: non_negative(entry.size_rw),
            ..Default::default()
        },
    }
}

async fn collect_one(
    client: Arc<dyn RuntimeClient>,
    entry: ContainerEntry,
    deadline: Instant,
) -> ContainerSnapshot {
    let ContainerSnapshot {
        identity,
        mut metrics,
    } = base_snapshot(&entry);

    let image_ref = if entry.image_id.is_empty() {
        entry.image.as_str()
    } else {
        entry.image_id.as_str()
    };
    match within(deadline, "inspect_image", client.inspect_image(image_ref)).await {
        Ok(image) => metrics.image_size_bytes = non_negative(image.size),
        Err(e) => debug!(error = %e, container = %identity.name, "image size unavailable"),
    }

    match within(deadline, "inspect_container", client.inspect_container(&entry.id)).await {
        Ok(detail) => metrics.cpu_limit = detail.cpu_limit_cores(),
        Err(e) => debug!(error = %e, container = %identity.name, "cpu limit unavailable"),
    }

    // The daemon has no live stats for anything but running containers.
    if !identity.state.is_running() {
        return ContainerSnapshot { identity, metrics };
    }

    match within(deadline, "fetch_stats", client.fetch_stats(&entry.id)).await {
        Ok(raw) => stats::apply_statistics(&raw, &mut metrics),
        Err(e) => debug!(error = %e, container = %identity.name, "live stats unavailable"),
    }

    ContainerSnapshot { identity, metrics }
}

/// Bound a runtime call by the cycle deadline.
async fn within<T>(
    deadline: Instant,
    operation: &'static str,
    call: impl Future<Output = Result<T, RuntimeError>>,
) -> Result<T, RuntimeError> {
    match timeout_at(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(RuntimeError::DeadlineExceeded { operation }),
    }
}

fn non_negative(v: i64) -> u64 {
    v.max(0) as u64
}

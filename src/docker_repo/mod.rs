// Docker runtime access via bollard

pub mod collector;
pub mod stats;

pub use collector::{CollectError, Collector};

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, ListImagesOptions, StatsOptions,
};
use bollard::models::ContainerStatsResponse;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::instrument;

/// How long startup waits for the daemon to answer a ping.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("docker: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("{operation} did not finish before the cycle deadline")]
    DeadlineExceeded { operation: &'static str },
    #[error("stats stream for {id} ended without a payload")]
    EmptyStats { id: String },
}

/// Container entry from the list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerEntry {
    pub id: String,
    pub names: Vec<String>,
    /// Image reference as the user named it (e.g. "nginx:latest").
    pub image: String,
    /// Resolved image id; preferred for image inspection when present.
    pub image_id: String,
    pub state: String,
    pub status: String,
    pub created: i64,
    /// Writable layer size, only populated when sizes were requested.
    pub size_rw: i64,
}

/// CPU limit fields from a container inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerDetail {
    pub nano_cpus: i64,
    pub cpu_quota: i64,
    pub cpu_period: i64,
}

impl ContainerDetail {
    /// Configured limit in cores: NanoCPUs first, then quota/period, else 0 (unlimited).
    pub fn cpu_limit_cores(&self) -> f64 {
        if self.nano_cpus > 0 {
            self.nano_cpus as f64 / 1e9
        } else if self.cpu_quota > 0 && self.cpu_period > 0 {
            self.cpu_quota as f64 / self.cpu_period as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageDetail {
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageEntry {
    pub id: String,
    pub size: i64,
}

/// Daemon-wide counters from the info endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaemonInfo {
    pub server_version: String,
    pub containers: i64,
    pub containers_running: i64,
    pub containers_paused: i64,
    pub containers_stopped: i64,
    pub ncpu: i64,
    pub mem_total: i64,
    pub os_type: String,
    pub architecture: String,
}

/// The runtime calls the collector needs. `DockerRepo` talks to a real
/// daemon; tests script their own implementation.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    async fn list_containers(
        &self,
        include_stopped: bool,
        want_sizes: bool,
    ) -> Result<Vec<ContainerEntry>, RuntimeError>;

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetail, RuntimeError>;

    async fn inspect_image(&self, image: &str) -> Result<ImageDetail, RuntimeError>;

    /// One non-streaming stats payload carrying both the current and the
    /// preceding sample.
    async fn fetch_stats(&self, id: &str) -> Result<ContainerStatsResponse, RuntimeError>;

    async fn daemon_info(&self) -> Result<DaemonInfo, RuntimeError>;

    async fn list_images(&self) -> Result<Vec<ImageEntry>, RuntimeError>;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to the local daemon and verify it answers. Any failure here is
    /// fatal for the process.
    pub async fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        match tokio::time::timeout(CONNECT_TIMEOUT, docker.ping()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => anyhow::bail!("failed to connect to Docker daemon: {}", e),
            Err(_) => anyhow::bail!(
                "Docker daemon did not answer within {}s",
                CONNECT_TIMEOUT.as_secs()
            ),
        }
        tracing::debug!("Connected to Docker daemon");
        Ok(Self { docker })
    }
}

#[async_trait]
impl RuntimeClient for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_containers(
        &self,
        include_stopped: bool,
        want_sizes: bool,
    ) -> Result<Vec<ContainerEntry>, RuntimeError> {
        let options = ListContainersOptions {
            all: include_stopped,
            size: want_sizes,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers
            .into_iter()
            .map(|c| ContainerEntry {
                id: c.id.unwrap_or_default(),
                names: c.names.unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                image_id: c.image_id.unwrap_or_default(),
                state: c.state.map(|s| s.to_string()).unwrap_or_default(),
                status: c.status.unwrap_or_default(),
                created: c.created.unwrap_or(0),
                size_rw: c.size_rw.unwrap_or(0),
            })
            .collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetail, RuntimeError> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        let host = info.host_config.unwrap_or_default();
        Ok(ContainerDetail {
            nano_cpus: host.nano_cpus.unwrap_or(0),
            cpu_quota: host.cpu_quota.unwrap_or(0),
            cpu_period: host.cpu_period.unwrap_or(0),
        })
    }

    async fn inspect_image(&self, image: &str) -> Result<ImageDetail, RuntimeError> {
        let info = self.docker.inspect_image(image).await?;
        Ok(ImageDetail {
            size: info.size.unwrap_or(0),
        })
    }

    async fn fetch_stats(&self, id: &str) -> Result<ContainerStatsResponse, RuntimeError> {
        // stream=false still waits for the daemon to take a second sample,
        // which is what fills precpu_stats.
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        match stream.next().await {
            Some(result) => Ok(result?),
            None => Err(RuntimeError::EmptyStats { id: id.to_string() }),
        }
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "daemon_info"))]
    async fn daemon_info(&self) -> Result<DaemonInfo, RuntimeError> {
        let info = self.docker.info().await?;
        Ok(DaemonInfo {
            server_version: info.server_version.unwrap_or_default(),
            containers: info.containers.unwrap_or(0),
            containers_running: info.containers_running.unwrap_or(0),
            containers_paused: info.containers_paused.unwrap_or(0),
            containers_stopped: info.containers_stopped.unwrap_or(0),
            ncpu: info.ncpu.unwrap_or(0),
            mem_total: info.mem_total.unwrap_or(0),
            os_type: info.os_type.unwrap_or_default(),
            architecture: info.architecture.unwrap_or_default(),
        })
    }

    async fn list_images(&self) -> Result<Vec<ImageEntry>, RuntimeError> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::default()))
            .await?;
        Ok(images
            .into_iter()
            .map(|img| ImageEntry {
                id: img.id,
                size: img.size,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_limit_prefers_nano_cpus() {
        let d = ContainerDetail {
            nano_cpus: 1_500_000_000,
            cpu_quota: 50_000,
            cpu_period: 100_000,
        };
        assert!((d.cpu_limit_cores() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn cpu_limit_uses_quota_over_period() {
        let d = ContainerDetail {
            nano_cpus: 0,
            cpu_quota: 50_000,
            cpu_period: 100_000,
        };
        assert!((d.cpu_limit_cores() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cpu_limit_unlimited_without_positive_pair() {
        assert_eq!(ContainerDetail::default().cpu_limit_cores(), 0.0);
        let d = ContainerDetail {
            nano_cpus: -1,
            cpu_quota: -1,
            cpu_period: 100_000,
        };
        assert_eq!(d.cpu_limit_cores(), 0.0);
    }
}

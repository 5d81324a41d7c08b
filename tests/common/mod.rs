// Shared test helpers: a scripted in-memory runtime client.

#![allow(dead_code)]

use async_trait::async_trait;
use bollard::models::{
    ContainerCpuStats, ContainerCpuUsage, ContainerMemoryStats, ContainerPidsStats,
    ContainerStatsResponse,
};
use docker_stats::docker_repo::{
    ContainerDetail, ContainerEntry, DaemonInfo, ImageDetail, ImageEntry, RuntimeClient,
    RuntimeError,
};
use docker_stats::session::{Session, View};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// System-counter delta used by `running`; CPU deltas are expressed against it.
const SYSTEM_DELTA_NS: u64 = 1_000_000_000;

#[derive(Clone)]
pub struct FakeContainer {
    pub entry: ContainerEntry,
    pub detail: ContainerDetail,
    pub image_size: i64,
    pub stats: ContainerStatsResponse,
    pub fail_stats: bool,
    pub fail_inspect: bool,
    pub fail_image: bool,
    pub panic_stats: bool,
    pub stats_delay: Option<Duration>,
}

impl FakeContainer {
    pub fn with_memory(mut self, usage: u64, limit: u64) -> Self {
        self.stats.memory_stats = Some(ContainerMemoryStats {
            usage: Some(usage),
            limit: Some(limit),
            ..Default::default()
        });
        self
    }

    pub fn with_nano_cpus(mut self, nano_cpus: i64) -> Self {
        self.detail.nano_cpus = nano_cpus;
        self
    }

    pub fn failing_stats(mut self) -> Self {
        self.fail_stats = true;
        self
    }

    pub fn failing_inspect(mut self) -> Self {
        self.fail_inspect = true;
        self
    }

    pub fn failing_image(mut self) -> Self {
        self.fail_image = true;
        self
    }

    /// The stats call panics, taking its collector task down with it.
    pub fn panicking_stats(mut self) -> Self {
        self.panic_stats = true;
        self
    }

    pub fn slow_stats(mut self, delay: Duration) -> Self {
        self.stats_delay = Some(delay);
        self
    }
}

fn cpu_stats(total_usage: u64, system_usage: u64) -> ContainerCpuStats {
    ContainerCpuStats {
        cpu_usage: Some(ContainerCpuUsage {
            total_usage: Some(total_usage),
            ..Default::default()
        }),
        system_cpu_usage: Some(system_usage),
        online_cpus: Some(1),
        ..Default::default()
    }
}

/// A running container whose stats payload derives to `cpu_percent` on one core.
pub fn running(id: &str, name: &str, cpu_percent: f64) -> FakeContainer {
    let cpu_delta = (cpu_percent / 100.0 * SYSTEM_DELTA_NS as f64).round() as u64;
    FakeContainer {
        entry: ContainerEntry {
            id: format!("{id}{}", "0".repeat(64 - id.len().min(64))),
            names: vec![format!("/{name}")],
            image: format!("{name}:latest"),
            image_id: format!("sha256:{id}"),
            state: "running".into(),
            status: "Up 5 minutes".into(),
            created: 1_700_000_000,
            size_rw: 4096,
        },
        detail: ContainerDetail::default(),
        image_size: 100 * 1024 * 1024,
        stats: ContainerStatsResponse {
            cpu_stats: Some(cpu_stats(10_000_000_000 + cpu_delta, 50 * SYSTEM_DELTA_NS)),
            precpu_stats: Some(cpu_stats(10_000_000_000, 49 * SYSTEM_DELTA_NS)),
            pids_stats: Some(ContainerPidsStats {
                current: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        },
        fail_stats: false,
        fail_inspect: false,
        fail_image: false,
        panic_stats: false,
        stats_delay: None,
    }
}

pub fn stopped(id: &str, name: &str) -> FakeContainer {
    let mut c = running(id, name, 0.0);
    c.entry.state = "exited".into();
    c.entry.status = "Exited (0) 2 hours ago".into();
    c
}

fn server_error(message: &str) -> RuntimeError {
    RuntimeError::Docker(bollard::errors::Error::DockerResponseServerError {
        status_code: 500,
        message: message.to_string(),
    })
}

/// Scripted runtime. Behaves like the daemon for `include_stopped`: without
/// it only running containers are listed.
#[derive(Default)]
pub struct FakeRuntime {
    containers: Mutex<Vec<FakeContainer>>,
    fail_list: AtomicBool,
    fail_info: AtomicBool,
    list_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
    lists_in_flight: AtomicUsize,
    max_lists_in_flight: AtomicUsize,
    stats_calls: Mutex<Vec<String>>,
}

impl FakeRuntime {
    pub fn new(containers: Vec<FakeContainer>) -> Self {
        let fake = Self::default();
        fake.set_containers(containers);
        fake
    }

    pub fn set_containers(&self, containers: Vec<FakeContainer>) {
        *self.containers.lock().unwrap() = containers;
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_info(&self, fail: bool) {
        self.fail_info.store(fail, Ordering::SeqCst);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Highest number of `list_containers` calls ever running at once.
    pub fn max_lists_in_flight(&self) -> usize {
        self.max_lists_in_flight.load(Ordering::SeqCst)
    }

    /// Full ids passed to `fetch_stats`, in call order.
    pub fn stats_calls(&self) -> Vec<String> {
        self.stats_calls.lock().unwrap().clone()
    }

    fn find(&self, id: &str) -> Option<FakeContainer> {
        self.containers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.entry.id == id || c.entry.image_id == id || c.entry.image == id)
            .cloned()
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn list_containers(
        &self,
        include_stopped: bool,
        _want_sizes: bool,
    ) -> Result<Vec<ContainerEntry>, RuntimeError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.lists_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_lists_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lists_in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error("list failed"));
        }
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| include_stopped || c.entry.state == "running")
            .map(|c| c.entry.clone())
            .collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetail, RuntimeError> {
        match self.find(id) {
            Some(c) if !c.fail_inspect => Ok(c.detail),
            _ => Err(server_error("inspect failed")),
        }
    }

    async fn inspect_image(&self, image: &str) -> Result<ImageDetail, RuntimeError> {
        match self.find(image) {
            Some(c) if !c.fail_image => Ok(ImageDetail { size: c.image_size }),
            _ => Err(server_error("no such image")),
        }
    }

    async fn fetch_stats(&self, id: &str) -> Result<ContainerStatsResponse, RuntimeError> {
        self.stats_calls.lock().unwrap().push(id.to_string());
        let Some(c) = self.find(id) else {
            return Err(server_error("no such container"));
        };
        if let Some(delay) = c.stats_delay {
            tokio::time::sleep(delay).await;
        }
        if c.panic_stats {
            panic!("stats decoder blew up for {id}");
        }
        if c.fail_stats {
            return Err(RuntimeError::EmptyStats { id: id.to_string() });
        }
        Ok(c.stats)
    }

    async fn daemon_info(&self) -> Result<DaemonInfo, RuntimeError> {
        if self.fail_info.load(Ordering::SeqCst) {
            return Err(server_error("info failed"));
        }
        let containers = self.containers.lock().unwrap();
        let running = containers
            .iter()
            .filter(|c| c.entry.state == "running")
            .count() as i64;
        Ok(DaemonInfo {
            server_version: "27.3.1".into(),
            containers: containers.len() as i64,
            containers_running: running,
            containers_paused: 0,
            containers_stopped: containers.len() as i64 - running,
            ncpu: 8,
            mem_total: 16 * 1024 * 1024 * 1024,
            os_type: "linux".into(),
            architecture: "x86_64".into(),
        })
    }

    async fn list_images(&self) -> Result<Vec<ImageEntry>, RuntimeError> {
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .map(|c| ImageEntry {
                id: c.entry.image_id.clone(),
                size: c.image_size,
            })
            .collect())
    }
}

/// Poll the session view until `pred` holds, failing the test after `limit`.
pub async fn wait_for(session: &Session, limit: Duration, pred: impl Fn(&View) -> bool) -> View {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        let view = session.view();
        if pred(&view) {
            return view;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within {limit:?}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

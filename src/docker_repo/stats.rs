// Derive display metrics from a raw Docker stats response.
// Pure functions: no I/O, no clock, deterministic for a given payload.

use crate::models::ResourceMetrics;
use bollard::models::{
    ContainerBlkioStatEntry, ContainerCpuStats, ContainerNetworkStats, ContainerStatsResponse,
};
use std::collections::HashMap;

/// One cumulative CPU sample as embedded in a stats payload ("cpu_stats" or "precpu_stats").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    pub total_usage_ns: u64,
    pub system_usage_ns: u64,
    pub online_cpus: u32,
    pub percpu_entries: usize,
}

impl CpuSample {
    pub fn from_stats(cpu: &ContainerCpuStats) -> Self {
        let usage = cpu.cpu_usage.as_ref();
        CpuSample {
            total_usage_ns: usage.and_then(|u| u.total_usage).unwrap_or(0),
            system_usage_ns: cpu.system_cpu_usage.unwrap_or(0),
            online_cpus: cpu.online_cpus.unwrap_or(0),
            percpu_entries: usage
                .and_then(|u| u.percpu_usage.as_ref())
                .map_or(0, |p| p.len()),
        }
    }

    /// Cores to scale by: reported online count, else per-core entries, else 1.
    pub fn core_count(&self) -> f64 {
        if self.online_cpus > 0 {
            self.online_cpus as f64
        } else if self.percpu_entries > 0 {
            self.percpu_entries as f64
        } else {
            1.0
        }
    }
}

/// CPU% from the two samples of one payload. Zero unless both the container
/// and system counters moved forward. Not clamped at 100 * cores.
pub fn cpu_percent(current: &CpuSample, previous: &CpuSample) -> f64 {
    let cpu_delta = current.total_usage_ns as i128 - previous.total_usage_ns as i128;
    let system_delta = current.system_usage_ns as i128 - previous.system_usage_ns as i128;
    if cpu_delta <= 0 || system_delta <= 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * current.core_count() * 100.0
}

pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    usage as f64 / limit as f64 * 100.0
}

/// (rx, tx) summed over every interface.
pub fn network_totals(networks: Option<&HashMap<String, ContainerNetworkStats>>) -> (u64, u64) {
    networks.map_or((0, 0), |n| {
        n.values().fold((0u64, 0u64), |(rx, tx), v| {
            (
                rx.saturating_add(v.rx_bytes.unwrap_or(0)),
                tx.saturating_add(v.tx_bytes.unwrap_or(0)),
            )
        })
    })
}

/// (read, write) summed over entries tagged "read"/"write" in any case.
/// Other ops ("sync", "total", ...) are ignored.
pub fn block_io_totals(entries: Option<&[ContainerBlkioStatEntry]>) -> (u64, u64) {
    let mut read = 0u64;
    let mut write = 0u64;
    for e in entries.unwrap_or_default() {
        let Some(op) = e.op.as_deref() else {
            continue;
        };
        if op.eq_ignore_ascii_case("read") {
            read = read.saturating_add(e.value.unwrap_or(0));
        } else if op.eq_ignore_ascii_case("write") {
            write = write.saturating_add(e.value.unwrap_or(0));
        }
    }
    (read, write)
}

/// Fill the live-stats fields of `metrics` from one payload. Fields the
/// payload lacks stay at zero; limit and size fields set by earlier
/// inspect calls are left untouched.
pub(crate) fn apply_statistics(s: &ContainerStatsResponse, metrics: &mut ResourceMetrics) {
    metrics.cpu_percent = match (s.cpu_stats.as_ref(), s.precpu_stats.as_ref()) {
        (Some(cur), Some(pre)) => {
            cpu_percent(&CpuSample::from_stats(cur), &CpuSample::from_stats(pre))
        }
        _ => 0.0,
    };

    metrics.memory_usage_bytes = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    metrics.memory_limit_bytes = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);
    metrics.memory_percent = memory_percent(metrics.memory_usage_bytes, metrics.memory_limit_bytes);

    (metrics.network_rx_bytes, metrics.network_tx_bytes) = network_totals(s.networks.as_ref());

    (metrics.block_read_bytes, metrics.block_write_bytes) = block_io_totals(
        s.blkio_stats
            .as_ref()
            .and_then(|b| b.io_service_bytes_recursive.as_deref()),
    );

    metrics.pids = s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        ContainerBlkioStats, ContainerCpuUsage, ContainerMemoryStats, ContainerPidsStats,
    };

    fn minimal_cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    fn sample(total: u64, system: u64, online: u32, percpu: usize) -> CpuSample {
        CpuSample {
            total_usage_ns: total,
            system_usage_ns: system,
            online_cpus: online,
            percpu_entries: percpu,
        }
    }

    #[test]
    fn cpu_percent_scales_by_online_cpus() {
        let cur = sample(100_000_000, 1_000_000_000, 2, 0);
        let pre = sample(50_000_000, 500_000_000, 2, 0);
        // (50M / 500M) * 2 * 100
        assert!((cpu_percent(&cur, &pre) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_percent_is_zero_without_forward_deltas() {
        for cores in [0, 1, 64] {
            let pre = sample(50, 500, cores, 0);
            assert_eq!(cpu_percent(&sample(50, 1000, cores, 0), &pre), 0.0);
            assert_eq!(cpu_percent(&sample(100, 500, cores, 0), &pre), 0.0);
            assert_eq!(cpu_percent(&sample(100, 400, cores, 0), &pre), 0.0);
            // counter reset on the container side
            assert_eq!(cpu_percent(&sample(10, 1000, cores, 0), &pre), 0.0);
        }
    }

    #[test]
    fn cpu_core_count_falls_back_to_percpu_then_one() {
        let pre = sample(0, 0, 0, 0);
        assert!((cpu_percent(&sample(10, 100, 0, 4), &pre) - 40.0).abs() < 1e-9);
        assert!((cpu_percent(&sample(10, 100, 0, 0), &pre) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_percent_is_not_clamped() {
        let cur = sample(300, 100, 4, 0);
        let pre = sample(0, 0, 4, 0);
        assert!((cpu_percent(&cur, &pre) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn memory_percent_guards_zero_limit() {
        assert_eq!(memory_percent(12345, 0), 0.0);
        assert_eq!(memory_percent(0, 0), 0.0);
        assert!((memory_percent(1 << 30, 1 << 31) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn block_io_matches_ops_case_insensitively_and_ignores_others() {
        let entries = vec![
            ContainerBlkioStatEntry {
                op: Some("Read".to_string()),
                value: Some(100),
                ..Default::default()
            },
            ContainerBlkioStatEntry {
                op: Some("read".to_string()),
                value: Some(5),
                ..Default::default()
            },
            ContainerBlkioStatEntry {
                op: Some("WRITE".to_string()),
                value: Some(200),
                ..Default::default()
            },
            ContainerBlkioStatEntry {
                op: Some("Total".to_string()),
                value: Some(305),
                ..Default::default()
            },
            ContainerBlkioStatEntry {
                op: None,
                value: Some(7),
                ..Default::default()
            },
        ];
        assert_eq!(block_io_totals(Some(&entries)), (105, 200));
        assert_eq!(block_io_totals(None), (0, 0));
    }

    #[test]
    fn network_totals_sum_all_interfaces() {
        let mut m = HashMap::new();
        m.insert(
            "eth0".to_string(),
            ContainerNetworkStats {
                rx_bytes: Some(1000),
                tx_bytes: Some(2000),
                ..Default::default()
            },
        );
        m.insert(
            "eth1".to_string(),
            ContainerNetworkStats {
                rx_bytes: Some(24),
                tx_bytes: None,
                ..Default::default()
            },
        );
        assert_eq!(network_totals(Some(&m)), (1024, 2000));
        assert_eq!(network_totals(None), (0, 0));
    }

    #[test]
    fn apply_statistics_fills_live_fields() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100_000_000, 1_000_000_000)),
            precpu_stats: Some(minimal_cpu_stats(50_000_000, 500_000_000)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            pids_stats: Some(ContainerPidsStats {
                current: Some(5),
                ..Default::default()
            }),
            blkio_stats: Some(ContainerBlkioStats {
                io_service_bytes_recursive: Some(vec![ContainerBlkioStatEntry {
                    op: Some("write".to_string()),
                    value: Some(200),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut out = ResourceMetrics {
            cpu_limit: 1.5,
            image_size_bytes: 42,
            ..Default::default()
        };
        apply_statistics(&s, &mut out);
        assert!((out.cpu_percent - 20.0).abs() < 0.01);
        assert_eq!(out.memory_usage_bytes, 256 * 1024 * 1024);
        assert_eq!(out.memory_limit_bytes, 512 * 1024 * 1024);
        assert!((out.memory_percent - 50.0).abs() < 1e-9);
        assert_eq!(out.pids, 5);
        assert_eq!(out.block_write_bytes, 200);
        assert_eq!(out.network_rx_bytes, 0);
        assert_eq!(out.cpu_limit, 1.5);
        assert_eq!(out.image_size_bytes, 42);
    }

    #[test]
    fn apply_statistics_zeroes_cpu_when_precpu_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 1000)),
            precpu_stats: None,
            ..Default::default()
        };
        let mut out = ResourceMetrics::default();
        apply_statistics(&s, &mut out);
        assert_eq!(out.cpu_percent, 0.0);
        assert_eq!(out.pids, 0);
    }
}

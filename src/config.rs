use crate::cli::Cli;
use crate::models::SortSpec;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up when neither `--config` nor `CONFIG_FILE` names one.
pub const DEFAULT_CONFIG_FILE: &str = "docker-stats.toml";

/// Shortest collect timeout accepted; anything lower never lets a stats call finish.
const MIN_COLLECT_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitoring: MonitoringConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Time between collect cycles.
    pub interval_ms: u64,
    /// Deadline for one whole cycle, shared by every runtime call in it.
    pub collect_timeout_ms: u64,
    /// List stopped containers too.
    pub show_all: bool,
    /// How often to log cycle counters at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            collect_timeout_ms: 10_000,
            show_all: false,
            stats_log_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub default_sort: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_sort: "cpu".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset.
    pub level: String,
    /// Log file for TUI mode. Without one, TUI-mode logs are discarded.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, else `CONFIG_FILE`, else `docker-stats.toml`.
    /// Only the implicit default may be missing.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("CONFIG_FILE").map(PathBuf::from));
        let path = match explicit {
            Some(p) => p,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::load_from_str(&s).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Command-line flags win over file values. Validates the merged result.
    pub fn apply_cli(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(interval) = cli.interval {
            self.monitoring.interval_ms = interval.as_millis() as u64;
        }
        if let Some(timeout) = cli.timeout {
            self.monitoring.collect_timeout_ms = timeout.as_millis() as u64;
        }
        if cli.all {
            self.monitoring.show_all = true;
        }
        if let Some(sort) = &cli.sort {
            self.display.default_sort = sort.clone();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.monitoring.interval_ms)
    }

    pub fn collect_timeout(&self) -> Duration {
        Duration::from_millis(self.monitoring.collect_timeout_ms)
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::from_name(&self.display.default_sort)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.interval_ms > 0,
            "monitoring.interval_ms must be > 0, got {}",
            self.monitoring.interval_ms
        );
        anyhow::ensure!(
            self.monitoring.collect_timeout_ms >= MIN_COLLECT_TIMEOUT_MS,
            "monitoring.collect_timeout_ms must be >= {}, got {}",
            MIN_COLLECT_TIMEOUT_MS,
            self.monitoring.collect_timeout_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.logging.level.trim().is_empty(),
            "logging.level must be non-empty"
        );
        Ok(())
    }
}

// Command-line flags

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Live resource usage of local Docker containers
#[derive(Debug, Default, Parser)]
#[command(name = "docker-stats")]
#[command(
    author,
    version,
    about = "Live resource usage of local Docker containers",
    long_about = None
)]
pub struct Cli {
    /// Refresh interval, e.g. `2s`, `500ms` or `3` (seconds)
    #[arg(long, short, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Include stopped containers
    #[arg(long, short)]
    pub all: bool,

    /// Print one snapshot and exit instead of starting the UI
    #[arg(long)]
    pub once: bool,

    /// With --once, print JSON instead of a table
    #[arg(long, requires = "once")]
    pub json: bool,

    /// Initial sort column: name, cpu, mem, net, disk, image
    #[arg(long, short)]
    pub sort: Option<String>,

    /// Deadline for one collect cycle, same format as --interval
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Config file (defaults to docker-stats.toml when present)
    #[arg(long, short, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Accepts `<n>ms`, `<n>s`, `<n>m` or a bare number of seconds (fractions allowed).
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (number, scale_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000.0)
    } else {
        (s, 1_000.0)
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{s}'"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("duration must be positive, got '{s}'"));
    }
    Ok(Duration::from_millis((value * scale_ms).round() as u64))
}

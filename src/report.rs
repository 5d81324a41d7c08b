// One-shot output for --once: a plain-text table or JSON

use crate::format::{
    format_bytes, format_cpu_limit, format_mem_usage, format_percent, truncate,
};
use crate::models::{ContainerSnapshot, DaemonSummary, SortSpec};
use serde::Serialize;
use std::io::Write;

const NAME_WIDTH: usize = 24;
const IMAGE_WIDTH: usize = 30;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: Option<&'a DaemonSummary>,
    sort: SortSpec,
    containers: &'a [ContainerSnapshot],
}

pub fn write_json(
    out: &mut impl Write,
    containers: &[ContainerSnapshot],
    summary: Option<&DaemonSummary>,
    sort: SortSpec,
) -> anyhow::Result<()> {
    let report = JsonReport {
        summary,
        sort,
        containers,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn summary_line(s: &DaemonSummary) -> String {
    format!(
        "Docker {} | containers {}/{} running ({} paused, {} stopped) \
         | images {} ({}) | {} CPUs, {} | {}/{}",
        s.server_version,
        s.containers_running,
        s.containers_total,
        s.containers_paused,
        s.containers_stopped,
        s.images_total,
        format_bytes(s.total_image_size_bytes),
        s.cpus,
        format_bytes(s.memory_total_bytes),
        s.os_type,
        s.architecture,
    )
}

pub fn write_text(
    out: &mut impl Write,
    containers: &[ContainerSnapshot],
    summary: Option<&DaemonSummary>,
) -> anyhow::Result<()> {
    if let Some(s) = summary {
        writeln!(out, "{}", summary_line(s))?;
        writeln!(out)?;
    }
    if containers.is_empty() {
        writeln!(out, "No containers found")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<nw$} {:<10} {:>8} {:>6} {:>8} {:>21} {:>10} {:>10} {:>10} {:>10} {:>6}  {:<iw$}",
        "NAME",
        "STATE",
        "CPU %",
        "LIMIT",
        "MEM %",
        "MEM USAGE / LIMIT",
        "NET RX",
        "NET TX",
        "DISK R",
        "DISK W",
        "PIDS",
        "IMAGE",
        nw = NAME_WIDTH,
        iw = IMAGE_WIDTH,
    )?;
    for c in containers {
        let m = &c.metrics;
        writeln!(
            out,
            "{:<nw$} {:<10} {:>8} {:>6} {:>8} {:>21} {:>10} {:>10} {:>10} {:>10} {:>6}  {:<iw$}",
            truncate(c.name(), NAME_WIDTH),
            c.identity.state.as_str(),
            format_percent(m.cpu_percent),
            format_cpu_limit(m.cpu_limit),
            format_percent(m.memory_percent),
            format_mem_usage(m.memory_usage_bytes, m.memory_limit_bytes),
            format_bytes(m.network_rx_bytes),
            format_bytes(m.network_tx_bytes),
            format_bytes(m.block_read_bytes),
            format_bytes(m.block_write_bytes),
            m.pids,
            truncate(&c.identity.image, IMAGE_WIDTH),
            nw = NAME_WIDTH,
            iw = IMAGE_WIDTH,
        )?;
    }
    Ok(())
}

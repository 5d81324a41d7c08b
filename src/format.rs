// Human-readable byte sizes and percentages for the table and the report

const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Binary-prefixed size: "512B", "1.5KiB", "2.0GiB".
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}

/// Magnitude bucket `format_bytes` picks: 0 for plain bytes, 1 for KiB, and so on.
pub fn magnitude(bytes: u64) -> usize {
    let mut order = 0;
    let mut rest = bytes;
    while rest >= 1024 && order < UNITS.len() {
        rest /= 1024;
        order += 1;
    }
    order
}

/// "used / limit", e.g. "1.0GiB / 2.0GiB".
pub fn format_mem_usage(usage: u64, limit: u64) -> String {
    format!("{} / {}", format_bytes(usage), format_bytes(limit))
}

pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p)
}

/// Core count, or "∞" when no limit is configured.
pub fn format_cpu_limit(cores: f64) -> String {
    if cores <= 0.0 {
        "∞".to_string()
    } else {
        format!("{:.2}", cores)
    }
}

/// Shorten `s` to at most `max` chars, marking the cut with "…".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

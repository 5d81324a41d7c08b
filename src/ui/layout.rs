//! Screen split: summary header, container table, status + key-hint footer.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
};

use super::footer::render_footer;
use super::header::render_header;
use super::table::render_table;
use crate::session::View;

const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 2;
/// Table borders plus the column header row.
const TABLE_CHROME: u16 = 3;

/// Table rows that fit in a terminal `height` rows tall (at least one).
pub fn visible_rows(height: u16) -> usize {
    height
        .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + TABLE_CHROME)
        .max(1) as usize
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);
    render_table(frame, chunks[1], view);
    render_footer(frame, chunks[2], view);
}

/// Colour for a percentage given its (warn, high, critical) thresholds.
pub fn threshold_color(value: f64, thresholds: (f64, f64, f64)) -> Color {
    let (warn, high, critical) = thresholds;
    if value >= critical {
        Color::Red
    } else if value >= high {
        Color::LightRed
    } else if value >= warn {
        Color::Yellow
    } else {
        Color::Green
    }
}

pub const CPU_THRESHOLDS: (f64, f64, f64) = (20.0, 50.0, 80.0);
pub const MEM_THRESHOLDS: (f64, f64, f64) = (40.0, 70.0, 90.0);

/// Fixed-width text bar, e.g. "███░░░░░" for 37%. Values above 100 fill it.
pub fn usage_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

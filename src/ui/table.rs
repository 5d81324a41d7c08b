//! Container table. Only the rows inside the scroll window are built.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::layout::{CPU_THRESHOLDS, MEM_THRESHOLDS, threshold_color, usage_bar};
use crate::format::{format_bytes, format_cpu_limit, truncate};
use crate::models::{ContainerSnapshot, ContainerState, SortField};
use crate::session::View;

const BAR_WIDTH: usize = 8;
const NAME_WIDTH: u16 = 22;

fn state_color(state: ContainerState) -> Color {
    match state {
        ContainerState::Running => Color::Green,
        ContainerState::Paused | ContainerState::Restarting => Color::Yellow,
        ContainerState::Exited | ContainerState::Dead => Color::Red,
        _ => Color::DarkGray,
    }
}

fn percent_cell(value: f64, thresholds: (f64, f64, f64)) -> Cell<'static> {
    Cell::from(format!("{:>6.1} {}", value, usage_bar(value, BAR_WIDTH)))
        .style(Style::default().fg(threshold_color(value, thresholds)))
}

fn row(c: &ContainerSnapshot) -> Row<'static> {
    let m = &c.metrics;
    let image = if m.image_size_bytes > 0 {
        format!("{} ({})", c.identity.image, format_bytes(m.image_size_bytes))
    } else {
        c.identity.image.clone()
    };
    Row::new(vec![
        Cell::from(truncate(c.name(), NAME_WIDTH as usize))
            .style(Style::default().fg(Color::White)),
        Cell::from(c.identity.state.as_str())
            .style(Style::default().fg(state_color(c.identity.state))),
        percent_cell(m.cpu_percent, CPU_THRESHOLDS),
        Cell::from(format_cpu_limit(m.cpu_limit)),
        percent_cell(m.memory_percent, MEM_THRESHOLDS),
        Cell::from(format_bytes(m.memory_usage_bytes)),
        Cell::from(format_bytes(m.memory_limit_bytes)),
        Cell::from(format_bytes(m.network_rx_bytes)),
        Cell::from(format_bytes(m.network_tx_bytes)),
        Cell::from(format_bytes(m.block_read_bytes)),
        Cell::from(format_bytes(m.block_write_bytes)),
        Cell::from(m.pids.to_string()),
        Cell::from(image).style(Style::default().fg(Color::Cyan)),
    ])
}

pub fn render_table(frame: &mut Frame, area: Rect, view: &View) {
    let marker = |field: SortField| -> &'static str {
        if view.sort.field == field {
            view.sort.direction.indicator()
        } else {
            ""
        }
    };

    let header = Row::new(vec![
        format!("NAME{}", marker(SortField::Name)),
        "STATE".into(),
        format!("CPU%{}", marker(SortField::Cpu)),
        "LIMIT".into(),
        format!("MEM%{}", marker(SortField::Memory)),
        "MEM USE".into(),
        "MEM LIMIT".into(),
        format!("NET RX{}", marker(SortField::NetworkIo)),
        "NET TX".into(),
        format!("DISK R{}", marker(SortField::BlockIo)),
        "DISK W".into(),
        "PIDS".into(),
        format!("IMAGE{}", marker(SortField::ImageSize)),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let window = view.cursor.window(view.snapshots.len(), view.visible_rows);
    let first = window.start;
    let rows: Vec<Row> = view.snapshots[window].iter().map(row).collect();

    let mut state = TableState::default();
    if !view.snapshots.is_empty() {
        state.select(Some(view.cursor.selected.saturating_sub(first)));
    }

    let title = format!("Containers ({})", view.snapshots.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(NAME_WIDTH),
            Constraint::Length(10),
            Constraint::Length(15),
            Constraint::Length(6),
            Constraint::Length(15),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Min(20),
        ],
    )
    .block(Block::default().borders(Borders::ALL).title(title))
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(table, area, &mut state);
}

//! Status line (sort, position, last error) and key hints.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::session::View;

/// "[a-b of n]" for the rows currently on screen.
pub fn scroll_indicator(view: &View) -> String {
    let count = view.snapshots.len();
    let window = view.cursor.window(count, view.visible_rows);
    if window.is_empty() {
        return format!("[0 of {}]", count);
    }
    format!("[{}-{} of {}]", window.start + 1, window.end, count)
}

pub fn render_footer(frame: &mut Frame, area: Rect, view: &View) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut status = vec![
        Span::raw(format!(
            " Sort: {} {} ",
            view.sort.field.label(),
            view.sort.direction.indicator()
        )),
        Span::styled(scroll_indicator(view), Style::default().fg(Color::Yellow)),
    ];
    if let Some(err) = &view.error {
        status.push(Span::raw("  "));
        status.push(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let hints = Line::from(vec![
        Span::styled(" n/c/m/t/d/i", key),
        Span::raw(":Sort "),
        Span::styled("↑↓/jk", key),
        Span::raw(":Move "),
        Span::styled("PgUp/PgDn", key),
        Span::raw(":Page "),
        Span::styled("g/G", key),
        Span::raw(":Top/Bottom "),
        Span::styled("r", key),
        Span::raw(":Refresh "),
        Span::styled(
            "q",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(":Quit"),
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(status), hints]), area);
}

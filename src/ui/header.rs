//! Summary bar: tool and daemon identity on the first line, counts on the second.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::format::format_bytes;
use crate::session::{Phase, View};
use crate::version;

pub fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    let updated = match view.last_updated {
        Some(t) => format!("updated {}", t.format("%H:%M:%S")),
        None => "waiting for first update".to_string(),
    };
    let phase = match view.phase {
        Phase::Idle | Phase::Loading => Span::styled(" ⟳", Style::default().fg(Color::Yellow)),
        Phase::Ready => Span::raw(""),
        Phase::Error => Span::styled(" ✗", Style::default().fg(Color::Red)),
    };

    let mut first = vec![Span::styled(
        version::banner(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    let second = match &view.summary {
        Some(s) => {
            first.extend([
                Span::raw(" | "),
                Span::styled(
                    format!("Docker {}", s.server_version),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(" | "),
                Span::styled(
                    format!("{}/{}", s.os_type, s.architecture),
                    Style::default().fg(Color::Blue),
                ),
                Span::raw(" | "),
                Span::styled(
                    format!("{} CPUs, {}", s.cpus, format_bytes(s.memory_total_bytes)),
                    Style::default().fg(Color::Magenta),
                ),
            ]);
            Line::from(vec![
                Span::styled("Containers: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{} running", s.containers_running),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(format!(
                    " / {} total ({} paused, {} stopped)",
                    s.containers_total, s.containers_paused, s.containers_stopped
                )),
                Span::raw(" | "),
                Span::styled("Images: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(
                    "{} ({})",
                    s.images_total,
                    format_bytes(s.total_image_size_bytes)
                )),
            ])
        }
        None => Line::from(Span::styled(
            "daemon summary unavailable",
            Style::default().fg(Color::DarkGray),
        )),
    };
    first.extend([
        Span::raw(" | "),
        Span::styled(updated, Style::default().fg(Color::White)),
        phase,
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(first), second]), area);
}

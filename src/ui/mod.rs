//! Terminal front end: draws the session view and turns keys into commands.

mod footer;
mod header;
pub mod layout;
mod table;

use crate::models::SortField;
use crate::session::{Command, Navigation, Session};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

/// Upper bound on how long a keypress or a finished cycle waits to be drawn.
const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Map a key to a session command. Unbound keys yield None.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    let command = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('n') => Command::SortBy(SortField::Name),
        KeyCode::Char('c') => Command::SortBy(SortField::Cpu),
        KeyCode::Char('m') => Command::SortBy(SortField::Memory),
        KeyCode::Char('t') => Command::SortBy(SortField::NetworkIo),
        KeyCode::Char('d') => Command::SortBy(SortField::BlockIo),
        KeyCode::Char('i') => Command::SortBy(SortField::ImageSize),
        KeyCode::Up | KeyCode::Char('k') => Command::Navigate(Navigation::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Navigate(Navigation::Down),
        KeyCode::PageUp => Command::Navigate(Navigation::PageUp),
        KeyCode::PageDown => Command::Navigate(Navigation::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Command::Navigate(Navigation::Home),
        KeyCode::End | KeyCode::Char('G') => Command::Navigate(Navigation::End),
        KeyCode::Char('r') => Command::RefreshNow,
        _ => return None,
    };
    Some(command)
}

/// Own the terminal until the session quits (key or signal). Blocking; run
/// it off the async runtime.
pub fn run(session: Session) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = event_loop(&mut terminal, &session);

    // Restore even when the loop failed, and make sure the worker stops.
    session.dispatch(Command::Quit);
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &Session,
) -> Result<()> {
    while !session.is_quitting() {
        let view = session.view();
        let mut rows = view.visible_rows;
        terminal.draw(|frame| {
            rows = layout::visible_rows(frame.area().height);
            layout::render(frame, &view);
        })?;
        if rows != view.visible_rows {
            session.dispatch(Command::Resize { visible_rows: rows });
        }

        if event::poll(FRAME_INTERVAL).context("Failed to poll events")? {
            if let Event::Key(key) = event::read().context("Failed to read event")? {
                if !handle_key(session, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Returns false once the key quit the session.
fn handle_key(session: &Session, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return true;
    }
    match map_key(key.code, key.modifiers) {
        Some(command) => session.dispatch(command),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> Option<Command> {
        map_key(code, KeyModifiers::NONE)
    }

    fn sort(field: SortField) -> Option<Command> {
        Some(Command::SortBy(field))
    }

    fn nav(to: Navigation) -> Option<Command> {
        Some(Command::Navigate(to))
    }

    #[test]
    fn sort_keys() {
        assert_eq!(plain(KeyCode::Char('n')), sort(SortField::Name));
        assert_eq!(plain(KeyCode::Char('c')), sort(SortField::Cpu));
        assert_eq!(plain(KeyCode::Char('m')), sort(SortField::Memory));
        assert_eq!(plain(KeyCode::Char('t')), sort(SortField::NetworkIo));
        assert_eq!(plain(KeyCode::Char('d')), sort(SortField::BlockIo));
        assert_eq!(plain(KeyCode::Char('i')), sort(SortField::ImageSize));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_sorts() {
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Command::Quit));
        assert_eq!(plain(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(plain(KeyCode::Esc), Some(Command::Quit));
    }

    #[test]
    fn navigation_and_refresh_keys() {
        assert_eq!(plain(KeyCode::Char('j')), nav(Navigation::Down));
        assert_eq!(plain(KeyCode::Up), nav(Navigation::Up));
        assert_eq!(
            map_key(KeyCode::Char('G'), KeyModifiers::SHIFT),
            nav(Navigation::End)
        );
        assert_eq!(plain(KeyCode::Home), nav(Navigation::Home));
        assert_eq!(plain(KeyCode::PageDown), nav(Navigation::PageDown));
        assert_eq!(plain(KeyCode::Char('r')), Some(Command::RefreshNow));
        assert_eq!(plain(KeyCode::Char('x')), None);
    }
}

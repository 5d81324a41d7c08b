// Selection cursor and scroll window over the sorted table.

use serde::Serialize;

/// Navigation commands from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Selected row and first visible row. Invariants after every mutation:
/// `selected <= count - 1` (0 when empty) and
/// `scroll <= max(0, count - visible_rows)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected: usize,
    pub scroll: usize,
}

impl ViewState {
    /// Re-establish the invariants for a set of `count` rows shown through a
    /// window of `visible_rows`.
    pub fn clamp(&mut self, count: usize, visible_rows: usize) {
        let visible = visible_rows.max(1);
        self.selected = self.selected.min(count.saturating_sub(1));
        self.scroll = self.scroll.min(count.saturating_sub(visible));
    }

    pub fn navigate(&mut self, nav: Navigation, count: usize, visible_rows: usize) {
        if count == 0 {
            *self = ViewState::default();
            return;
        }
        let visible = visible_rows.max(1);
        let last = count - 1;
        self.selected = match nav {
            Navigation::Up => self.selected.saturating_sub(1),
            Navigation::Down => (self.selected + 1).min(last),
            Navigation::PageUp => self.selected.saturating_sub(visible),
            Navigation::PageDown => (self.selected + visible).min(last),
            Navigation::Home => 0,
            Navigation::End => last,
        };
        self.scroll_to_selection(visible);
        self.clamp(count, visible);
    }

    /// Move the window only when the selection left it.
    pub fn scroll_to_selection(&mut self, visible_rows: usize) {
        let visible = visible_rows.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
    }

    /// Index range of the rows currently on screen.
    pub fn window(&self, count: usize, visible_rows: usize) -> std::ops::Range<usize> {
        let start = self.scroll.min(count);
        let end = (start + visible_rows.max(1)).min(count);
        start..end
    }
}

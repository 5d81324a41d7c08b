// Session state: the current snapshot set, sort and cursor, mutated only
// through the transition functions below.

mod cursor;
mod handle;

pub use cursor::{Navigation, ViewState};
pub use handle::{Session, SharedState};
pub(crate) use handle::lock as lock_state;

use crate::docker_repo::CollectError;
use crate::models::{ContainerSnapshot, DaemonSummary, SortField, SortSpec};
use crate::sorter;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Rows assumed visible before the presentation reports its real size.
pub const DEFAULT_VISIBLE_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing collected yet.
    Idle,
    Loading,
    Ready,
    /// Last collect failed; the previous table is still shown.
    Error,
}

/// Commands the presentation layer sends into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SortBy(SortField),
    Navigate(Navigation),
    RefreshNow,
    Resize { visible_rows: usize },
    Quit,
}

/// Result of one collect cycle, committed atomically.
#[derive(Debug)]
pub struct CycleOutcome {
    pub containers: Result<Vec<ContainerSnapshot>, CollectError>,
    pub summary: Option<DaemonSummary>,
}

/// Read-only copy of everything the presentation needs for one frame.
#[derive(Debug, Clone)]
pub struct View {
    pub phase: Phase,
    pub snapshots: Arc<Vec<ContainerSnapshot>>,
    pub sort: SortSpec,
    pub cursor: ViewState,
    pub visible_rows: usize,
    pub summary: Option<DaemonSummary>,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
}

impl View {
    pub fn selected(&self) -> Option<&ContainerSnapshot> {
        self.snapshots.get(self.cursor.selected)
    }
}

#[derive(Debug)]
pub struct SessionState {
    phase: Phase,
    snapshots: Arc<Vec<ContainerSnapshot>>,
    sort: SortSpec,
    cursor: ViewState,
    visible_rows: usize,
    summary: Option<DaemonSummary>,
    error: Option<String>,
    last_updated: Option<DateTime<Local>>,
    quitting: bool,
    cycles_ok: u64,
    cycles_failed: u64,
}

impl SessionState {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            phase: Phase::Idle,
            snapshots: Arc::new(Vec::new()),
            sort,
            cursor: ViewState::default(),
            visible_rows: DEFAULT_VISIBLE_ROWS,
            summary: None,
            error: None,
            last_updated: None,
            quitting: false,
            cycles_ok: 0,
            cycles_failed: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn cursor(&self) -> ViewState {
        self.cursor
    }

    pub fn snapshots(&self) -> &[ContainerSnapshot] {
        &self.snapshots
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// (successful cycles, failed cycles) since start.
    pub fn cycle_counts(&self) -> (u64, u64) {
        (self.cycles_ok, self.cycles_failed)
    }

    /// A collect is about to start. The error indicator stays up until a
    /// cycle succeeds.
    pub fn begin_cycle(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Commit a finished cycle. On success the whole set is swapped, re-sorted
    /// with the active sort and the cursor clamped; on failure the previous
    /// set and cursor are kept untouched.
    pub fn commit(&mut self, outcome: CycleOutcome) {
        self.summary = outcome.summary;
        match outcome.containers {
            Ok(mut snapshots) => {
                sorter::apply_spec(&mut snapshots, self.sort);
                self.snapshots = Arc::new(snapshots);
                self.cursor.clamp(self.snapshots.len(), self.visible_rows);
                self.error = None;
                self.last_updated = Some(Local::now());
                self.phase = Phase::Ready;
                self.cycles_ok += 1;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.phase = Phase::Error;
                self.cycles_failed += 1;
            }
        }
    }

    /// Sort-by command: re-sorts the current set, no fetch.
    pub fn sort_by(&mut self, field: SortField) {
        self.sort = self.sort.toggled(field);
        sorter::apply_spec(Arc::make_mut(&mut self.snapshots).as_mut_slice(), self.sort);
    }

    pub fn navigate(&mut self, nav: Navigation) {
        self.cursor
            .navigate(nav, self.snapshots.len(), self.visible_rows);
    }

    pub fn resize(&mut self, visible_rows: usize) {
        self.visible_rows = visible_rows.max(1);
        self.cursor.clamp(self.snapshots.len(), self.visible_rows);
        self.cursor.scroll_to_selection(self.visible_rows);
    }

    pub fn quit(&mut self) {
        self.quitting = true;
    }

    /// Apply the state-only part of a command. `RefreshNow` has no effect on
    /// state; the scheduler handles it.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SortBy(field) => self.sort_by(field),
            Command::Navigate(nav) => self.navigate(nav),
            Command::Resize { visible_rows } => self.resize(visible_rows),
            Command::Quit => self.quit(),
            Command::RefreshNow => {}
        }
    }

    pub fn view(&self) -> View {
        View {
            phase: self.phase,
            snapshots: self.snapshots.clone(),
            sort: self.sort,
            cursor: self.cursor,
            visible_rows: self.visible_rows,
            summary: self.summary.clone(),
            error: self.error.clone(),
            last_updated: self.last_updated,
        }
    }
}

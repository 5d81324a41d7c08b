// Presentation-facing handle: atomic view reads and command input.

use super::{Command, SessionState, View};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};

/// The single mutual-exclusion boundary around session state.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Lock the state. A panic while holding the lock cannot leave it half
/// updated (every transition swaps whole values), so poisoning is ignored.
pub(crate) fn lock(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cheap to clone; every clone talks to the same state and scheduler.
#[derive(Clone)]
pub struct Session {
    state: SharedState,
    refresh_tx: mpsc::Sender<()>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl Session {
    pub fn new(
        state: SharedState,
        refresh_tx: mpsc::Sender<()>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            state,
            refresh_tx,
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Consistent copy of the current state for one frame.
    pub fn view(&self) -> View {
        lock(&self.state).view()
    }

    pub fn is_quitting(&self) -> bool {
        lock(&self.state).is_quitting()
    }

    /// Feed one command in. Returns false once the session is quitting.
    pub fn dispatch(&self, command: Command) -> bool {
        match command {
            Command::RefreshNow => {
                // A full channel means a refresh is already queued.
                if self.refresh_tx.try_send(()).is_err() {
                    tracing::debug!("refresh already pending; coalesced");
                }
            }
            Command::Quit => {
                lock(&self.state).quit();
                let _ = self.shutdown_tx.send(true);
            }
            other => lock(&self.state).apply(other),
        }
        !self.is_quitting()
    }
}

// Refresh scheduler: one task owns the tick timer and runs collect cycles.
// Tick and manual refresh go through the same loop, so at most one collect
// is in flight and each finished cycle commits exactly once.

use crate::docker_repo::Collector;
use crate::models::SortSpec;
use crate::session::{CycleOutcome, Session, SessionState, SharedState, lock_state};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval, interval_at};
use tracing::Instrument;

/// Collector, shared state and the channels the session handle feeds.
pub struct WorkerDeps {
    pub collector: Arc<Collector>,
    pub state: SharedState,
    pub refresh_rx: mpsc::Receiver<()>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Worker timing config.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub interval: Duration,
    /// Upper bound for one whole cycle, list call included.
    pub collect_timeout: Duration,
    pub include_stopped: bool,
    /// How often to log cycle counters (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Build the session and spawn its scheduler. The returned handle finishes
/// after `Command::Quit`; await it before dropping the runtime client.
pub fn start(
    collector: Arc<Collector>,
    sort: SortSpec,
    config: WorkerConfig,
) -> (Session, tokio::task::JoinHandle<()>) {
    let state: SharedState = Arc::new(Mutex::new(SessionState::new(sort)));
    // Capacity 1: refresh requests made while one is queued coalesce.
    let (refresh_tx, refresh_rx) = mpsc::channel(1);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn(
        WorkerDeps {
            collector,
            state: state.clone(),
            refresh_rx,
            shutdown_rx,
        },
        config,
    );
    (Session::new(state, refresh_tx, shutdown_tx), handle)
}

/// Run one list → fan-out → derive cycle plus the daemon summary, both bounded
/// by the same deadline. A summary failure only drops the summary.
pub async fn collect_cycle(
    collector: &Collector,
    include_stopped: bool,
    timeout: Duration,
) -> CycleOutcome {
    let deadline = Instant::now() + timeout;
    let (containers, summary) = tokio::join!(
        collector.collect(include_stopped, deadline),
        collector.daemon_summary(deadline),
    );
    let summary = match summary {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, operation = "daemon_summary", "daemon summary unavailable");
            None
        }
    };
    match &containers {
        Ok(c) => tracing::debug!(containers = c.len(), "collect cycle finished"),
        Err(e) => tracing::warn!(error = %e, operation = "collect", "collect cycle failed"),
    }
    CycleOutcome {
        containers,
        summary,
    }
}

async fn run_cycle(collector: &Collector, state: &SharedState, config: &WorkerConfig) {
    lock_state(state).begin_cycle();
    let outcome = collect_cycle(collector, config.include_stopped, config.collect_timeout).await;
    lock_state(state).commit(outcome);
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        collector,
        state,
        mut refresh_rx,
        mut shutdown_rx,
    } = deps;

    let span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_ms = config.interval.as_millis() as u64
    );

    tokio::spawn(
        async move {
            let mut tick = interval(config.interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);
            let mut stats_log_tick =
                interval_at(Instant::now() + stats_log_interval, stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = tick.tick() => {}
                    Some(()) = refresh_rx.recv() => {
                        tracing::debug!("manual refresh");
                        tick.reset();
                    }
                    _ = shutdown_rx.changed() => break,
                    _ = stats_log_tick.tick() => {
                        let ((ok, failed), containers) = {
                            let s = lock_state(&state);
                            (s.cycle_counts(), s.snapshots().len())
                        };
                        tracing::info!(
                            cycles_ok = ok,
                            cycles_failed = failed,
                            containers,
                            "app stats"
                        );
                        continue;
                    }
                }

                tokio::select! {
                    _ = run_cycle(&collector, &state, &config) => {}
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("shutdown during collect; abandoning cycle");
                        break;
                    }
                }
            }
            tracing::debug!("Worker shutting down");
        }
        .instrument(span),
    )
}

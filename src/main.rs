use anyhow::{Context, Result};
use clap::Parser;
use docker_stats::docker_repo::{Collector, DockerRepo, RuntimeClient};
use docker_stats::session::{Command, Session};
use docker_stats::*;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// The UI owns the terminal, so logs go to the configured file or nowhere.
/// One-shot mode logs to stderr and keeps stdout for the report.
fn init_tracing(config: &config::AppConfig, once: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, ansi) = if once {
        (BoxMakeWriter::new(std::io::stderr), true)
    } else if let Some(path) = &config.logging.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        (BoxMakeWriter::new(Mutex::new(file)), false)
    } else {
        (BoxMakeWriter::new(std::io::sink), false)
    };
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run_once(collector: &Collector, app_config: &config::AppConfig, json: bool) -> Result<()> {
    let outcome = worker::collect_cycle(
        collector,
        app_config.monitoring.show_all,
        app_config.collect_timeout(),
    )
    .await;
    let mut containers = outcome.containers?;
    let sort = app_config.sort_spec();
    sorter::apply_spec(&mut containers, sort);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        report::write_json(&mut out, &containers, outcome.summary.as_ref(), sort)?;
    } else {
        report::write_text(&mut out, &containers, outcome.summary.as_ref())?;
    }
    out.flush()?;
    Ok(())
}

async fn run_interactive(collector: Arc<Collector>, app_config: &config::AppConfig) -> Result<()> {
    let (session, worker_handle) = worker::start(
        collector,
        app_config.sort_spec(),
        worker::WorkerConfig {
            interval: app_config.interval(),
            collect_timeout: app_config.collect_timeout(),
            include_stopped: app_config.monitoring.show_all,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let signal_session: Session = session.clone();
    let signal_task = tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Received shutdown signal");
        signal_session.dispatch(Command::Quit);
    });

    let ui_session = session.clone();
    let ui_result = tokio::task::spawn_blocking(move || ui::run(ui_session))
        .await
        .context("UI thread panicked")?;

    session.dispatch(Command::Quit);
    signal_task.abort();
    if let Err(e) = worker_handle.await {
        tracing::warn!(error = %e, "worker task ended abnormally");
    }
    ui_result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let app_config = config::AppConfig::load(cli.config.as_deref())?.apply_cli(&cli)?;
    init_tracing(&app_config, cli.once)?;
    tracing::info!(
        version = %version::banner(),
        interval_ms = app_config.monitoring.interval_ms,
        show_all = app_config.monitoring.show_all,
        "starting"
    );

    let docker_repo = DockerRepo::connect().await.context(
        "cannot reach the Docker daemon; is it running and is your user allowed to use its socket?",
    )?;
    let client: Arc<dyn RuntimeClient> = Arc::new(docker_repo);
    let collector = Arc::new(Collector::new(client));

    let result = if cli.once {
        run_once(&collector, &app_config, cli.json).await
    } else {
        run_interactive(collector.clone(), &app_config).await
    };

    // The worker has stopped by now; this releases the last client handle.
    drop(collector);
    tracing::info!("shutdown complete");
    result
}

//! ingestd - priority batch ingestion daemon
//!
//! CLI entry point: loads config, spawns the dispatcher, serves HTTP until
//! a shutdown signal arrives.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use ingestd::api::build_router;
use ingestd::cli::Cli;
use ingestd::config::Config;
use ingestd::fetch::create_fetcher;
use ingestd::scheduler::{Dispatcher, WorkQueue};
use ingestd::service::IngestionService;
use ingestd::store::IngestionStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = match level_str {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref())
        .context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        debug!(port, "main: overriding configured port");
        config.server.port = port;
    }
    config.validate()?;

    info!(
        batch_size = config.scheduler.batch_size,
        dispatch_interval_secs = config.scheduler.dispatch_interval_secs,
        "ingestd starting"
    );

    let store = Arc::new(IngestionStore::new());
    let queue = Arc::new(WorkQueue::new());
    let fetcher = create_fetcher(&config.fetch);

    let dispatcher = Dispatcher::new(
        queue.clone(),
        store.clone(),
        fetcher,
        config.scheduler.dispatch_interval(),
    );
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let dispatcher_handle = tokio::spawn(dispatcher.run(shutdown_rx));

    let service = Arc::new(IngestionService::new(
        store,
        queue,
        config.scheduler.batch_size,
    ));
    let app = build_router(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The dispatcher finishes its in-flight batch before observing this.
    info!("Shutting down...");
    let _ = shutdown_tx.send(()).await;
    let _ = dispatcher_handle.await;
    debug!("main: shutdown complete");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => tracing::warn!("SIGINT received"),
            _ = sigterm.recv() => tracing::warn!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::warn!("Ctrl+C received");
    }
}

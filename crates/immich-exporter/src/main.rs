//! immich-exporter — Prometheus exporter for the Immich admin API.
//!
//! Assembles the upstream client, the snapshot collector and the HTTP
//! surface into one process:
//! - Upstream client (Immich admin API, 10s request timeout)
//! - Metrics collector (one concurrent snapshot per scrape)
//! - HTTP server (`/metrics`, `/health`)
//!
//! # Usage
//!
//! ```text
//! IMMICH_URL=http://immich:2283 IMMICH_API_KEY=... immich-exporter --listen-address :8080
//! ```

mod config;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use immich_api::{ApiState, build_router};
use immich_client::ImmichClient;
use immich_metrics::{BuildInfo, Collector};

use config::{Cli, Config, LogFormat};

/// How long in-flight requests may drain after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = Config::from_cli(cli).context("invalid configuration")?;
    run(config).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let build_info = BuildInfo::from_build_env();
    info!(
        version = %build_info.version,
        commit = %build_info.commit,
        date = %build_info.date,
        "Immich exporter starting"
    );

    // ── Initialize subsystems ──────────────────────────────────

    let client = ImmichClient::new(&config.immich_url, &config.api_key)
        .context("failed to build Immich client")?;
    info!(url = client.base_url(), "upstream client initialized");

    let collector = Collector::new(Arc::new(client));
    info!(families = collector.catalog().len(), "metrics collector initialized");

    let router = build_router(ApiState::new(collector, build_info));

    // ── Start HTTP server ──────────────────────────────────────

    let listener = tokio::net::TcpListener::bind(config.listen_address.as_str())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address))?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    // Bounds the drain: once the signal fires, in-flight work gets SHUTDOWN_GRACE.
    let drain_deadline = async move {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result.context("HTTP server error")?,
        () = drain_deadline => {
            warn!(grace_secs = SHUTDOWN_GRACE.as_secs(), "graceful drain timed out");
        }
    }

    info!("Immich exporter stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}

// exporter/src/main.rs

//! IRI Prometheus exporter binary.
//!
//! Serves:
//!
//! - `GET /metrics` (and `/Metrics`): one scrape of the configured IRI node,
//! - `GET /health`: liveness probe.
//!
//! Each scrape queries `getNodeInfo` and `getNeighbors`, builds a fresh
//! registry from the answers, and discards it once the response is
//! written.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;

use bridge::HttpNodeClient;
use config::{Cli, ExporterConfig};
use state::AppState;

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "exporter=info,bridge=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = ExporterConfig::from(Cli::parse());
    cfg.bridge.validate().context("invalid configuration")?;

    // ---------------------------
    // Node API client
    // ---------------------------

    let client = HttpNodeClient::from_config(&cfg.bridge.node_api)
        .context("failed to create node API client")?;
    tracing::info!(
        node = client.base_url(),
        timeout_secs = client.timeout().as_secs_f64(),
        "scraping IRI node"
    );

    let app_state = Arc::new(AppState::new(Arc::new(client), cfg.bridge.scrape.clone()));

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app = routes::router(app_state);

    tracing::info!("exporter listening on http://{}/metrics", cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("exporter server error")?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

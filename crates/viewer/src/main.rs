//! `viewer` — share link resolution service.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Select the record source (hosted URL or local file).
//! 4. Build the Axum router and serve until interrupted.

mod config;
mod records;
mod server;
mod telemetry;

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "viewer starting"
    );

    // -----------------------------------------------------------------------
    // 3. Record source
    // -----------------------------------------------------------------------
    let source = records::from_config(&cfg)?;
    info!(source = %source.describe(), "record source selected");
    if let Err(e) = source.fetch().await {
        // Not fatal: the store may be published after the viewer starts.
        warn!(error = %e, "record store not readable at startup");
    }

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(source, cfg.generic_message.clone(), cfg.collapse_fallbacks);
    let timeout = server::middleware::request_timeout(Duration::from_secs(cfg.fetch_timeout_secs));
    let router = server::router::build(state, timeout);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("viewer stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

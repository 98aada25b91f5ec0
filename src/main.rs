//! Request Observer
//!
//! A reverse proxy front that observes every request before forwarding it.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────┐
//!                    │                 REQUEST OBSERVER                   │
//!   Client Request   │  ┌──────────┐   ┌───────────┐   ┌──────────────┐   │
//!   ─────────────────┼─▶│  http    │──▶│  inspect  │──▶│  telemetry   │   │
//!                    │  │  server  │   │ headers,  │   │ gate + sink  │   │
//!                    │  └──────────┘   │ body,     │   └──────┬───────┘   │
//!                    │                 │ classifier│          │           │
//!                    │                 └───────────┘          ▼           │
//!   Client Response  │                               ┌──────────────┐     │
//!   ◀────────────────┼───────────────────────────────│   forward    │◀────┼──── Upstream
//!                    │                               └──────────────┘     │
//!                    │   config · observability · lifecycle               │
//!                    └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_observer::config::{self, ObserverConfig};
use request_observer::http::HttpServer;
use request_observer::lifecycle::{shutdown_signal, Shutdown};
use request_observer::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "request-observer")]
#[command(about = "Reverse proxy front that logs and reports every request", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ObserverConfig::default(),
    };

    let _log_guard = logging::init_logging(&config.logging)?;

    tracing::info!("request-observer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        telemetry_sink = ?config.telemetry.sink,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.metrics.enabled {
        match config.metrics.address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.metrics.address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.signal();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

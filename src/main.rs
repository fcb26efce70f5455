//! Aipex Middleman
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 MIDDLEMAN                    │
//!     Client Request   │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!     ─────────────────┼─▶│ server │──▶│ token gate │──▶│forwarder │──┼──▶ Carrier
//!                      │  └────────┘   └────────────┘   └────┬─────┘  │    API
//!                      │                                     │        │
//!     Client Response  │  ┌──────────┐                       │        │
//!     ◀────────────────┼──│  relay   │◀──────────────────────┘◀───────┼──
//!                      │  └──────────┘                                │
//!                      │  config · access log · metrics · shutdown    │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use aipex_middleman::config::{load_config, ListenerConfig};
use aipex_middleman::lifecycle::{signals, Shutdown};
use aipex_middleman::observability::{logging, metrics};
use aipex_middleman::HttpServer;

#[derive(Parser)]
#[command(name = "aipex-middleman")]
#[command(about = "Forwards shipment calls to the carrier API", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env file is normal in production
    let dotenv = dotenvy::dotenv();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.listener = ListenerConfig::with_port(port);
    }

    let _log_guard = logging::init_logging(&config.observability);
    tracing::info!("aipex-middleman v{} starting", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded .env");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.carrier.accept_invalid_certs {
        tracing::warn!("Carrier TLS certificate verification is disabled");
    }

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Webhook relay service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Shopify webhook                ┌──────────────────────────────────────────┐
//!   ──────────────────────────────▶│  http server  →  relay handler           │
//!                                  │                   │                      │
//!                                  │                   ▼                      │
//!                                  │           signature verifier             │
//!                                  │                   │ (valid only)         │
//!                                  │                   ▼                      │
//!   200 / 401 / 500  ◀─────────────│  response  ◀  forwarder ─────────────────┼──▶ Maistro API
//!                                  └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use webhook_relay::config::load_config;
use webhook_relay::lifecycle::{wait_for_signal, Shutdown};
use webhook_relay::observability::{logging, metrics};
use webhook_relay::{Forwarder, HttpServer};

#[derive(Parser)]
#[command(name = "webhook-relay")]
#[command(about = "Verify Shopify webhooks and relay them to Maistro", long_about = None)]
struct Args {
    /// Optional TOML file with non-secret settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("webhook-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.credentials() {
        tracing::warn!(error = %e, "Webhooks will be rejected until configuration is complete");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        maistro_base_url = %config.maistro.base_url,
        override_agent = %config.maistro.override_agent,
        forward_timeout_secs = config.timeouts.forward_secs,
        "Configuration loaded"
    );

    if let Some(address) = &config.observability.metrics_address {
        let addr: SocketAddr = address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let forwarder = Forwarder::from_config(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(Arc::new(config), forwarder);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Virtual-host gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ metrics ─▶ timeout
//!                                                          │
//!                                                          ▼
//!                     ┌───────────────────────────────────────────┐
//!                     │ authorization gate                        │
//!                     │   unsecured pattern / OPTIONS → permit    │
//!                     │   session principal → permit              │
//!                     │   otherwise → 401 or login redirect       │
//!                     └─────────────────────┬─────────────────────┘
//!                                           ▼
//!                     ┌───────────────────────────────────────────┐
//!                     │ host-path rewrite (last stage)            │
//!                     │   /<host>/ or bundled resource → match    │
//!                     │   trailing slash → .../index.html         │
//!                     │   Location: <original path>               │
//!                     └─────────────────────┬─────────────────────┘
//!                                           ▼
//!     Client Response ◀──────────── static resource server
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use vhost_gateway::config::{apply_bind_override, load_config, GatewayConfig};
use vhost_gateway::lifecycle::{assemble, signals, Shutdown};
use vhost_gateway::observability::{logging, metrics};
use vhost_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "vhost-gateway")]
#[command(about = "Virtual-host static site gateway", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long, env = "GATEWAY_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    let config = apply_bind_override(config, cli.bind)?;

    logging::init_logging(&config.observability);
    tracing::info!("vhost-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_location = %config.static_files.location,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let gateway = assemble(config)?;
    let bind_address = gateway.config.listener.bind_address.clone();
    let server = GatewayServer::new(gateway);

    // Bind last: traffic only once every component is ready.
    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! News and HTTP-cat proxy backend.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser ──▶ ┌──────────────────────────────────────────────┐
//!               │ http: request id → trace → timeout → cors     │
//!               │       → metrics → error boundary → handlers   │
//!               │                                   │           │
//!               │       validation ◀────────────────┤           │
//!               │                                   ▼           │
//!               │       upstream: news.rs / image.rs ──────────┼──▶ NewsAPI / http.cat
//!               │                                   │           │
//!   Browser ◀── │       response.rs (envelopes) ◀───┘           │
//!               └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use newscat_proxy::config;
use newscat_proxy::lifecycle::{self, signals, Shutdown};
use newscat_proxy::observability::{logging, metrics};
use newscat_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "newscat-proxy")]
#[command(about = "Backend proxying news search and HTTP cat images", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "NEWSCAT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = config::load(args.config.as_deref())?;
    logging::init_tracing(&config.observability);

    tracing::info!("newscat-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    lifecycle::preflight(&config)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    lifecycle::startup::log_banner(&config, local_addr);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::forward_to(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

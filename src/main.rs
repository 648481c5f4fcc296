//! Referrer gate demo server.
//!
//! ```text
//!   request ──▶ TraceLayer ──▶ referrer filter ──▶ echo handler
//!                                   │
//!                                   └── 403 when the referrer is untrusted
//!
//!   config file ──▶ watcher ──▶ reload task ──▶ snapshot swap
//!   admin listener ──▶ /admin/referrers (read-only dump)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use referrer_gate::admin::{setup_admin_router, AdminState, DiagnosticsBoard};
use referrer_gate::config::{load_config, watcher::ConfigWatcher, GateConfig};
use referrer_gate::filter::ReferrerFilter;
use referrer_gate::lifecycle::{shutdown, Shutdown};
use referrer_gate::observability::{logging, metrics};
use referrer_gate::GateServer;

#[derive(Parser)]
#[command(name = "referrer-gate", version, about = "Referrer-checking CSRF gate")]
struct Args {
    /// TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("referrer-gate v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_exporter(addr)?;
    }

    let board = Arc::new(DiagnosticsBoard::new());
    let filter_config = config.referrer_filter.clone();
    let diagnostics = board.clone();
    let filter = tokio::task::spawn_blocking(move || {
        ReferrerFilter::configure(&filter_config, diagnostics)
    })
    .await?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_ctrl_c());

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin endpoint listening");
        let app = setup_admin_router(AdminState::new(board.clone(), &config.admin.api_key));
        let admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown::wait(admin_shutdown))
                .await
            {
                tracing::error!(error = %e, "Admin server failed");
            }
        });
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    GateServer::new(filter.clone())
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    filter.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}

//! Helios Telemetry Service
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from a TOML file (`--config`), overridden by environment variables:
//! - `HELIOS_HOST`: Host to bind to (default: 0.0.0.0)
//! - `HELIOS_PORT`: Port to listen on (default: 8080)
//! - `HELIOS_BACKEND`: Telemetry source, "sim" or "socket" (default: sim)
//! - `HELIOS_SOCKET_PATH`: Socket path for the socket backend
//! - `HELIOS_SAMPLE_RATE_HZ`: Sample rate for the sim backend
//! - `HELIOS_LOG_LEVEL` / `RUST_LOG`: Log level (default: info)
//! - `HELIOS_LOG_FORMAT`: "pretty" or "json"

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helios_telemetry::api::{serve, AppState};
use helios_telemetry::config::Config;
use helios_telemetry::ingress::{spawn_backend, IngressStatus};
use helios_telemetry::telemetry::DistributionHub;

#[derive(Debug, Parser)]
#[command(name = "helios-telemetry", version, about = "Real-time drone telemetry service")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the API port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config);

    tracing::info!("Starting Helios telemetry service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(backend = %config.ingress.backend, "Telemetry source configured");

    let hub = Arc::new(DistributionHub::new(config.hub.to_hub_config()));
    let ingress_status = Arc::new(IngressStatus::new());

    let ingress_handle = spawn_backend(
        config.ingress.clone(),
        Arc::clone(&hub),
        Arc::clone(&ingress_status),
    );

    let state = AppState::new(hub, ingress_status, config.ingress.backend, config.api.clone());

    serve(state, &config.api).await?;

    ingress_handle.abort();
    tracing::info!("Helios telemetry service stopped");

    Ok(())
}

/// Initialize tracing from the logging config
///
/// `RUST_LOG` wins over the configured level; `format = "json"` switches to
/// structured output.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

//! # Helios Telemetry
//!
//! Real-time drone telemetry distribution service: accepts a continuous
//! stream of position, attitude, and battery updates from a single source and
//! serves them to many concurrent consumers over REST snapshots and WebSocket
//! streams.
//!
//! ## Modules
//!
//! - [`telemetry`]: the distribution core - latest-value store, subscriber
//!   registry, and the hub coordinating ingestion and fan-out
//! - [`ingress`]: telemetry source backends (simulator, Unix socket)
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: real-time streaming connections
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use helios_telemetry::telemetry::{Category, DistributionHub, TelemetrySample};
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = DistributionHub::default();
//!
//!     let sample = TelemetrySample::new(Category::Battery)
//!         .field("voltage_v", 12.4)
//!         .field("remaining_percent", 0.87);
//!     hub.publish(sample).await;
//!
//!     let latest = hub.snapshot(Category::Battery).await;
//!     assert!(latest.is_some());
//! }
//! ```

pub mod api;
pub mod config;
pub mod ingress;
pub mod telemetry;
pub mod websocket;

// Re-export top-level types for convenience
pub use telemetry::{
    Category, DistributionHub, FieldValue, HubConfig, OutboundSink, SinkError, SubscriberId,
    TelemetryError, TelemetryResult, TelemetrySample,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Backend, Config, ConfigError, IngressConfig, LoggingConfig};

pub use ingress::{IngressStatus, StatusSnapshot};

pub use websocket::{websocket_handler, ClientMessage, ServerMessage};

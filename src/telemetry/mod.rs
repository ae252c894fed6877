//! Telemetry Distribution Core
//!
//! In-memory, concurrency-safe hub that accepts a stream of telemetry updates,
//! keeps the latest sample per category, and fans accepted updates out to live
//! subscribers.
//!
//! ## Architecture
//!
//! - **CategoryStore**: latest sample per category, sharded per-category locks
//! - **SubscriptionRegistry**: live subscribers and their interest filters
//! - **DistributionHub**: the coordinator - publish, snapshot, subscribe
//!
//! Transport adapters (REST handlers, WebSocket connections, ingress backends)
//! only ever hold an `Arc<DistributionHub>`; no ambient globals.

mod error;
mod hub;
mod registry;
mod store;
mod types;

pub use error::{TelemetryError, TelemetryResult};
pub use hub::{DistributionHub, HubConfig};
pub use registry::{OutboundSink, SinkError, SubscriberId, SubscriptionRegistry};
pub use store::CategoryStore;
pub use types::{Category, FieldValue, TelemetrySample};

//! Application State
//!
//! Shared state accessible by all API handlers. The hub is an explicitly
//! constructed instance handed to every handler through this struct; there is
//! no process-wide telemetry global.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, Backend};
use crate::ingress::IngressStatus;
use crate::telemetry::DistributionHub;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Telemetry distribution hub
    pub hub: Arc<DistributionHub>,
    /// Connection state of the active ingress backend
    pub ingress: Arc<IngressStatus>,
    /// Which backend is feeding the hub
    pub backend: Backend,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        hub: Arc<DistributionHub>,
        ingress: Arc<IngressStatus>,
        backend: Backend,
        config: ApiConfig,
    ) -> Self {
        Self {
            hub,
            ingress,
            backend,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

//! Telemetry Ingress
//!
//! Backends that feed the distribution hub:
//!
//! - **sim**: simulated flight controller generating plausible samples at a
//!   configurable rate, for development and SITL-style testing
//! - **socket**: Unix domain socket client reading newline-delimited JSON
//!   frames from an external telemetry monitor
//!
//! Both run as background tasks, publish into the shared hub, and report
//! connection state through [`IngressStatus`] for the status endpoint.

pub mod sim;
pub mod socket;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::{Backend, IngressConfig};
use crate::telemetry::DistributionHub;

/// Connection state of the telemetry source
///
/// Written by the active backend task, read by `/api/status`.
pub struct IngressStatus {
    inner: RwLock<StatusInner>,
}

struct StatusInner {
    connected: bool,
    connecting: bool,
    started_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of the ingress connection state
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub connected: bool,
    pub connecting: bool,
    pub started_at: Option<DateTime<Utc>>,
}

impl IngressStatus {
    /// New status: connecting, not yet connected
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StatusInner {
                connected: false,
                connecting: true,
                started_at: None,
            }),
        }
    }

    /// Mark the source as connected; records the first connection time
    pub async fn mark_connected(&self) {
        let mut inner = self.inner.write().await;
        inner.connected = true;
        inner.connecting = false;
        if inner.started_at.is_none() {
            inner.started_at = Some(Utc::now());
        }
    }

    /// Mark the source as reconnecting
    pub async fn mark_connecting(&self) {
        let mut inner = self.inner.write().await;
        inner.connected = false;
        inner.connecting = true;
    }

    /// Mark the source as disconnected (not retrying)
    pub async fn mark_disconnected(&self) {
        let mut inner = self.inner.write().await;
        inner.connected = false;
        inner.connecting = false;
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read().await;
        StatusSnapshot {
            connected: inner.connected,
            connecting: inner.connecting,
            started_at: inner.started_at,
        }
    }
}

impl Default for IngressStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the configured ingress backend as a background task
pub fn spawn_backend(
    config: IngressConfig,
    hub: Arc<DistributionHub>,
    status: Arc<IngressStatus>,
) -> JoinHandle<()> {
    match config.backend {
        Backend::Sim => {
            tracing::info!(rate_hz = config.sample_rate_hz, "Backend: simulated flight controller");
            tokio::spawn(sim::run(config, hub, status))
        }
        Backend::Socket => {
            tracing::info!(path = %config.socket_path, "Backend: telemetry socket");
            tokio::spawn(socket::run(config, hub, status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_transitions() {
        let status = IngressStatus::new();

        let snap = status.snapshot().await;
        assert!(!snap.connected);
        assert!(snap.connecting);
        assert!(snap.started_at.is_none());

        status.mark_connected().await;
        let snap = status.snapshot().await;
        assert!(snap.connected);
        assert!(!snap.connecting);
        let first_start = snap.started_at.unwrap();

        // Reconnect cycle keeps the original start time
        status.mark_connecting().await;
        status.mark_connected().await;
        assert_eq!(status.snapshot().await.started_at, Some(first_start));

        status.mark_disconnected().await;
        let snap = status.snapshot().await;
        assert!(!snap.connected);
        assert!(!snap.connecting);
    }
}

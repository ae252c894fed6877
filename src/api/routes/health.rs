//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - liveness probe (process is alive)
//! - GET /health/ready - readiness probe (ready to serve traffic)
//! - GET /health - full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// The hub is in-memory and always able to serve snapshots, so readiness does
/// not depend on the telemetry source being connected - the API answers "no
/// data yet" until it is.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Full health status. A disconnected source is reported as degraded, not
/// unhealthy: snapshots still serve the last known values.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ingress = state.ingress.snapshot().await;

    let status = if ingress.connected { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        source_connected: ingress.connected,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}

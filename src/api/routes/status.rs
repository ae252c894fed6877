//! Status Route
//!
//! - GET /api/status - source connection state, distribution counters, uptime

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::StatusResponse;
use crate::api::state::AppState;

/// GET /api/status
pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let ingress = state.ingress.snapshot().await;

    Json(StatusResponse {
        backend: state.backend.to_string(),
        connected: ingress.connected,
        connecting: ingress.connecting,
        started_at: ingress.started_at.map(|t| t.to_rfc3339()),
        last_updated: state.hub.last_updated().await,
        subscribers: state.hub.subscriber_count().await,
        evicted_subscribers: state.hub.evicted_total(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

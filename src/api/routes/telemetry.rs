//! Telemetry Routes
//!
//! Point-in-time snapshot endpoints.
//!
//! - GET /api/telemetry - latest sample of every category
//! - GET /api/telemetry/{category} - latest sample for one category

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CategoryResponse, SampleDto, TelemetryResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::telemetry::Category;

/// GET /api/telemetry
///
/// Full snapshot: latest position, attitude, and battery readings. Categories
/// with no data yet are null rather than an error.
pub async fn full_snapshot(State(state): State<Arc<AppState>>) -> Json<TelemetryResponse> {
    let position = state.hub.snapshot(Category::Position).await.map(SampleDto::from);
    let attitude = state.hub.snapshot(Category::Attitude).await.map(SampleDto::from);
    let battery = state.hub.snapshot(Category::Battery).await.map(SampleDto::from);
    let last_updated = state.hub.last_updated().await;

    Json(TelemetryResponse {
        position,
        attitude,
        battery,
        last_updated,
    })
}

/// GET /api/telemetry/{category}
///
/// Latest sample for one category. Unknown category names are a 400; a known
/// category that has never received data is a 404 with code NO_DATA_YET.
pub async fn category_snapshot(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<CategoryResponse>> {
    let category: Category = category.parse()?;

    let sample = state
        .hub
        .snapshot(category)
        .await
        .ok_or(ApiError::NoData(category))?;

    Ok(Json(CategoryResponse::from(sample)))
}

//! API Error Types
//!
//! Defines error types for the API layer and implements conversion to HTTP
//! responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::telemetry::{Category, TelemetryError};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client asked for a category that does not exist
    #[error("Unknown telemetry category: {0}")]
    InvalidCategory(String),

    /// No sample has arrived yet for the requested category
    #[error("No data yet for category: {0}")]
    NoData(Category),

    /// Telemetry core error
    #[error("Telemetry error: {0}")]
    Telemetry(TelemetryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TelemetryError> for ApiError {
    fn from(e: TelemetryError) -> Self {
        match e {
            TelemetryError::InvalidCategory(name) => ApiError::InvalidCategory(name),
            other => ApiError::Telemetry(other),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidCategory(_) => (StatusCode::BAD_REQUEST, "INVALID_CATEGORY"),
            // "No data yet" is an expected state before the source connects
            ApiError::NoData(_) => (StatusCode::NOT_FOUND, "NO_DATA_YET"),
            ApiError::Telemetry(_) => (StatusCode::SERVICE_UNAVAILABLE, "TELEMETRY_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = ApiError::InvalidCategory("velocity".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::NoData(Category::Battery).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_telemetry_error() {
        let err: ApiError = TelemetryError::InvalidCategory("x".to_string()).into();
        assert!(matches!(err, ApiError::InvalidCategory(_)));

        let err: ApiError = TelemetryError::TooManySubscribers(10).into();
        assert!(matches!(err, ApiError::Telemetry(_)));
    }
}

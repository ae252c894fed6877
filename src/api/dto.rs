//! Data Transfer Objects
//!
//! Response types for the REST endpoints, serialized to JSON.

use serde::Serialize;
use std::collections::HashMap;

use crate::telemetry::{Category, FieldValue, TelemetrySample};

/// Latest sample for one category
#[derive(Debug, Serialize)]
pub struct SampleDto {
    /// Field name to value
    pub fields: HashMap<String, FieldValue>,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl From<TelemetrySample> for SampleDto {
    fn from(sample: TelemetrySample) -> Self {
        Self {
            fields: sample.fields,
            timestamp: sample.timestamp,
        }
    }
}

/// GET /api/telemetry response: latest sample of every category
#[derive(Debug, Serialize)]
pub struct TelemetryResponse {
    pub position: Option<SampleDto>,
    pub attitude: Option<SampleDto>,
    pub battery: Option<SampleDto>,
    /// Most recent accepted timestamp across categories (ms)
    pub last_updated: Option<i64>,
}

/// GET /api/telemetry/{category} response
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: Category,
    pub fields: HashMap<String, FieldValue>,
    pub timestamp: i64,
}

impl From<TelemetrySample> for CategoryResponse {
    fn from(sample: TelemetrySample) -> Self {
        Self {
            category: sample.category,
            fields: sample.fields,
            timestamp: sample.timestamp,
        }
    }
}

/// GET /api/status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Active ingress backend ("sim" or "socket")
    pub backend: String,
    pub connected: bool,
    pub connecting: bool,
    /// RFC 3339 time of the first successful source connection
    pub started_at: Option<String>,
    /// Most recent accepted sample timestamp (ms)
    pub last_updated: Option<i64>,
    /// Live WebSocket subscribers
    pub subscribers: usize,
    /// Subscribers dropped after failed deliveries
    pub evicted_subscribers: u64,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether the ingress source is currently connected
    pub source_connected: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dto_from_sample() {
        let sample = TelemetrySample::with_timestamp(Category::Position, 42)
            .field("latitude_deg", 34.05);
        let dto = SampleDto::from(sample);
        assert_eq!(dto.timestamp, 42);
        assert_eq!(dto.fields.len(), 1);
    }

    #[test]
    fn test_category_response_serialization() {
        let sample = TelemetrySample::with_timestamp(Category::Battery, 7).field("voltage_v", 12.4);
        let json = serde_json::to_string(&CategoryResponse::from(sample)).unwrap();
        assert!(json.contains("\"category\":\"battery\""));
        assert!(json.contains("\"voltage_v\":12.4"));
    }
}

//! API Documentation Route
//!
//! - GET /openapi.json - machine-readable OpenAPI 3.0 description

use axum::Json;
use serde_json::{json, Value};

/// GET /openapi.json
pub async fn openapi_spec() -> Json<Value> {
    Json(build_spec())
}

/// Static OpenAPI 3.0.3 document for the REST surface
///
/// The WebSocket stream is described in the info block only; OpenAPI has no
/// first-class WebSocket support.
fn build_spec() -> Value {
    let sample_schema = json!({
        "type": "object",
        "properties": {
            "category": {
                "type": "string",
                "enum": ["position", "attitude", "battery"],
            },
            "fields": {
                "type": "object",
                "additionalProperties": {"oneOf": [{"type": "number"}, {"type": "string"}]},
                "example": {
                    "latitude_deg": 34.0522017,
                    "longitude_deg": -118.2436842,
                    "absolute_altitude_m": 125.43,
                    "relative_altitude_m": 42.10,
                },
            },
            "timestamp": {
                "type": "integer",
                "format": "int64",
                "description": "Unix milliseconds",
                "example": 1_700_000_000_000i64,
            },
        },
    });

    let error_schema = json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": {"type": "string", "example": "NO_DATA_YET"},
                    "message": {"type": "string"},
                },
            },
            "request_id": {"type": "string", "format": "uuid"},
        },
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Helios Telemetry API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Real-time drone telemetry service.\n\n\
                ## REST Endpoints\n\
                JSON endpoints for on-demand telemetry snapshots.\n\n\
                ## WebSocket Stream\n\
                Connect to `ws://<host>/ws` for a continuous stream of samples \
                as they arrive. After connecting, send a JSON message to filter \
                categories:\n\
                ```json\n\
                {\"type\": \"subscribe\", \"categories\": [\"position\"]}\n\
                ```\n\
                Valid category names: `position`, `attitude`, `battery`, `all` (default).",
        },
        "servers": [
            {"url": "/", "description": "Current host"},
        ],
        "tags": [
            {"name": "Telemetry", "description": "Real-time drone sensor data"},
            {"name": "Status", "description": "Service and connection health"},
        ],
        "paths": {
            "/api/telemetry": {
                "get": {
                    "tags": ["Telemetry"],
                    "summary": "Full telemetry snapshot",
                    "description": "Latest position, attitude, and battery samples; null until a category has data.",
                    "operationId": "getTelemetry",
                    "responses": {
                        "200": {
                            "description": "Telemetry snapshot",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "position": {"allOf": [sample_schema], "nullable": true},
                                            "attitude": {"allOf": [sample_schema], "nullable": true},
                                            "battery": {"allOf": [sample_schema], "nullable": true},
                                            "last_updated": {
                                                "type": "integer",
                                                "format": "int64",
                                                "nullable": true,
                                                "description": "Unix milliseconds of the newest sample",
                                            },
                                        },
                                    },
                                },
                            },
                        },
                    },
                },
            },
            "/api/telemetry/{category}": {
                "get": {
                    "tags": ["Telemetry"],
                    "summary": "Latest sample for one category",
                    "operationId": "getCategoryTelemetry",
                    "parameters": [{
                        "name": "category",
                        "in": "path",
                        "required": true,
                        "schema": {
                            "type": "string",
                            "enum": ["position", "attitude", "battery"],
                        },
                    }],
                    "responses": {
                        "200": {
                            "description": "Latest sample",
                            "content": {"application/json": {"schema": sample_schema}},
                        },
                        "400": {
                            "description": "Unknown category",
                            "content": {"application/json": {"schema": error_schema}},
                        },
                        "404": {
                            "description": "No sample received yet",
                            "content": {"application/json": {"schema": error_schema}},
                        },
                    },
                },
            },
            "/api/status": {
                "get": {
                    "tags": ["Status"],
                    "summary": "Source connection state and service counters",
                    "operationId": "getStatus",
                    "responses": {
                        "200": {
                            "description": "Service status",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "backend": {"type": "string", "example": "sim"},
                                            "connected": {"type": "boolean"},
                                            "connecting": {"type": "boolean"},
                                            "started_at": {"type": "string", "format": "date-time", "nullable": true},
                                            "last_updated": {"type": "integer", "format": "int64", "nullable": true},
                                            "subscribers": {"type": "integer"},
                                            "evicted_subscribers": {"type": "integer"},
                                            "uptime_seconds": {"type": "integer"},
                                            "version": {"type": "string"},
                                        },
                                    },
                                },
                            },
                        },
                    },
                },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_shape() {
        let spec = build_spec();
        assert_eq!(spec["openapi"], "3.0.3");
        assert!(spec["paths"]["/api/telemetry"]["get"].is_object());
        assert!(spec["paths"]["/api/telemetry/{category}"]["get"].is_object());
        assert!(spec["paths"]["/api/status"]["get"].is_object());
    }
}

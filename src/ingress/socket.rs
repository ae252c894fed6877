//! Unix socket ingress
//!
//! Connects to an external telemetry monitor over a Unix domain socket and
//! reads newline-delimited JSON frames. A frame carries any subset of the
//! category sections:
//!
//! ```json
//! {"position": {"latitude_deg": 34.05, ...}, "battery": {"voltage_v": 12.4}}
//! ```
//!
//! Each present section becomes one `TelemetrySample` stamped at arrival time.
//! The connection is retried with a configurable delay; malformed lines are
//! skipped, never fatal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;

use super::IngressStatus;
use crate::config::IngressConfig;
use crate::telemetry::{Category, DistributionHub, FieldValue, TelemetrySample};

/// One newline-delimited frame from the telemetry monitor
#[derive(Debug, Deserialize)]
struct WireFrame {
    #[serde(default)]
    position: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    attitude: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    battery: Option<HashMap<String, serde_json::Value>>,
}

/// Run the socket client loop with reconnection; never returns
pub async fn run(config: IngressConfig, hub: Arc<DistributionHub>, status: Arc<IngressStatus>) {
    let reconnect = Duration::from_secs(config.reconnect_secs.max(1));

    loop {
        status.mark_connecting().await;

        match UnixStream::connect(&config.socket_path).await {
            Ok(stream) => {
                status.mark_connected().await;
                tracing::info!(path = %config.socket_path, "Connected to telemetry socket");

                if let Err(e) = read_frames(stream, &hub).await {
                    tracing::warn!(
                        path = %config.socket_path,
                        error = %e,
                        reconnect_secs = reconnect.as_secs(),
                        "Telemetry socket connection lost, reconnecting"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config.socket_path,
                    error = %e,
                    reconnect_secs = reconnect.as_secs(),
                    "Failed to connect to telemetry socket, retrying"
                );
            }
        }

        status.mark_connecting().await;
        tokio::time::sleep(reconnect).await;
    }
}

/// Read and publish frames until the stream ends or errors
async fn read_frames(stream: UnixStream, hub: &DistributionHub) -> std::io::Result<()> {
    let mut lines = BufReader::new(stream).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<WireFrame>(line) {
            Ok(frame) => {
                let timestamp = Utc::now().timestamp_millis();
                for sample in frame_samples(frame, timestamp) {
                    hub.publish(sample).await;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed telemetry frame");
            }
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "socket closed",
    ))
}

/// Convert the present sections of a frame into samples
fn frame_samples(frame: WireFrame, timestamp: i64) -> Vec<TelemetrySample> {
    let sections = [
        (Category::Position, frame.position),
        (Category::Attitude, frame.attitude),
        (Category::Battery, frame.battery),
    ];

    sections
        .into_iter()
        .filter_map(|(category, section)| {
            let fields = convert_fields(section?);
            if fields.is_empty() {
                return None;
            }
            Some(TelemetrySample::with_timestamp(category, timestamp).fields(fields))
        })
        .collect()
}

/// Keep numeric and string values; nulls and nested structures are dropped
fn convert_fields(raw: HashMap<String, serde_json::Value>) -> HashMap<String, FieldValue> {
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Number(n) => n.as_f64().map(|f| (key, FieldValue::Number(f))),
            serde_json::Value::String(s) => Some((key, FieldValue::Text(s))),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_frame() {
        let frame: WireFrame = serde_json::from_str(
            r#"{
                "position": {"latitude_deg": 34.05, "longitude_deg": -118.24},
                "attitude": {"roll_deg": 1.2, "pitch_deg": -0.4, "yaw_deg": 178.9},
                "battery": {"voltage_v": 12.4, "remaining_percent": 0.87}
            }"#,
        )
        .unwrap();

        let samples = frame_samples(frame, 1000);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].category, Category::Position);
        assert_eq!(samples[2].fields.get("voltage_v").and_then(FieldValue::as_f64), Some(12.4));
        assert!(samples.iter().all(|s| s.timestamp == 1000));
    }

    #[test]
    fn test_partial_frame() {
        let frame: WireFrame =
            serde_json::from_str(r#"{"battery": {"remaining_percent": 0.5}}"#).unwrap();

        let samples = frame_samples(frame, 1);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].category, Category::Battery);
    }

    #[test]
    fn test_nulls_and_nesting_dropped() {
        let frame: WireFrame = serde_json::from_str(
            r#"{"position": {"latitude_deg": null, "extra": {"nested": 1}, "mode": "GUIDED"}}"#,
        )
        .unwrap();

        let samples = frame_samples(frame, 1);
        assert_eq!(samples.len(), 1);
        let fields = &samples[0].fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("mode"), Some(&FieldValue::Text("GUIDED".to_string())));
    }

    #[test]
    fn test_empty_sections_yield_nothing() {
        let frame: WireFrame =
            serde_json::from_str(r#"{"position": {"latitude_deg": null}, "attitude": {}}"#).unwrap();
        assert!(frame_samples(frame, 1).is_empty());

        let frame: WireFrame = serde_json::from_str("{}").unwrap();
        assert!(frame_samples(frame, 1).is_empty());
    }

    #[test]
    fn test_unknown_top_level_keys_ignored() {
        let frame: Result<WireFrame, _> =
            serde_json::from_str(r#"{"velocity": {"x": 1.0}, "battery": {"voltage_v": 11.1}}"#);
        let samples = frame_samples(frame.unwrap(), 1);
        assert_eq!(samples.len(), 1);
    }
}

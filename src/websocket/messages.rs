//! WebSocket Message Types
//!
//! Defines the message formats exchanged between streaming clients and the
//! telemetry service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::telemetry::{Category, FieldValue, TelemetrySample};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Replace the category filter for this connection
    ///
    /// An empty list or the name "all" restores the full feed.
    Subscribe {
        categories: Vec<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A fresh telemetry sample
    Telemetry {
        category: Category,
        fields: HashMap<String, FieldValue>,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },
    /// Filter change confirmed; empty means the full feed
    Subscribed {
        categories: Vec<Category>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        message: String,
    },
    /// Connection established
    Connected {
        subscriber_id: String,
    },
}

impl ServerMessage {
    /// Wrap a sample for the wire
    pub fn telemetry(sample: TelemetrySample) -> Self {
        ServerMessage::Telemetry {
            category: sample.category,
            fields: sample.fields,
            timestamp: sample.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "categories": ["position", "battery"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { categories } => {
                assert_eq!(categories, vec!["position", "battery"]);
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_telemetry() {
        let sample = TelemetrySample::with_timestamp(Category::Battery, 1_700_000_000_000)
            .field("voltage_v", 12.4);
        let json = serde_json::to_string(&ServerMessage::telemetry(sample)).unwrap();

        assert!(json.contains("\"type\":\"telemetry\""));
        assert!(json.contains("\"category\":\"battery\""));
        assert!(json.contains("\"voltage_v\":12.4"));
        assert!(json.contains("\"timestamp\":1700000000000"));
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            subscriber_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"subscriber_id\":\"abc-123\""));
    }

    #[test]
    fn test_server_message_serialize_subscribed() {
        let msg = ServerMessage::Subscribed {
            categories: vec![Category::Position],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"subscribed\""));
        assert!(json.contains("\"categories\":[\"position\"]"));
    }
}

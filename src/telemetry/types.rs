//! Core telemetry types
//!
//! This module defines the fundamental types shared by the distribution core
//! and the transport adapters:
//! - `Category`: the fixed set of telemetry classes
//! - `FieldValue`: a tagged numeric-or-text payload value
//! - `TelemetrySample`: one immutable reading for a category at an instant

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::error::TelemetryError;

/// A class of telemetry data
///
/// Categories are a closed set: the flight controller reports position,
/// attitude, and battery streams, and each is cached independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// GPS position (latitude, longitude, altitude)
    Position,
    /// Orientation (roll, pitch, yaw in degrees)
    Attitude,
    /// Battery state (voltage, remaining charge)
    Battery,
}

impl Category {
    /// Get all categories for iteration
    pub fn all() -> &'static [Category] {
        &[Category::Position, Category::Attitude, Category::Battery]
    }

    /// Lowercase name used on the wire and in config
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Position => "position",
            Category::Attitude => "attitude",
            Category::Battery => "battery",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Category::Position),
            "attitude" => Ok(Category::Attitude),
            "battery" => Ok(Category::Battery),
            other => Err(TelemetryError::InvalidCategory(other.to_string())),
        }
    }
}

/// A single telemetry field value
///
/// Payload fields are dynamic (the set of fields varies by backend), so values
/// are tagged numeric-or-text rather than a fixed struct. Serialized untagged:
/// JSON numbers and strings map directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric reading (degrees, meters, volts, percent)
    Number(f64),
    /// Textual reading (mode names, status strings)
    Text(String),
}

impl FieldValue {
    /// Get the numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// One immutable telemetry reading for a category at an instant
///
/// Created by an ingress adapter for every incoming update. Never mutated
/// after publish; the hub stores and hands out clones, so callers never hold
/// references into hub storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySample {
    /// Which telemetry class this sample belongs to
    pub category: Category,
    /// Field name to value (e.g. "latitude_deg" -> 34.0522017)
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    /// Unix timestamp in milliseconds; drives staleness rejection
    pub timestamp: i64,
}

impl TelemetrySample {
    /// Create an empty sample stamped with the current time
    pub fn new(category: Category) -> Self {
        Self {
            category,
            fields: HashMap::new(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Create an empty sample with a specific timestamp
    pub fn with_timestamp(category: Category, timestamp: i64) -> Self {
        Self {
            category,
            fields: HashMap::new(),
            timestamp,
        }
    }

    /// Builder method: set one field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder method: merge a map of fields
    pub fn fields(mut self, fields: HashMap<String, FieldValue>) -> Self {
        self.fields.extend(fields);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in Category::all() {
            let parsed: Category = cat.as_str().parse().unwrap();
            assert_eq!(parsed, *cat);
        }
    }

    #[test]
    fn test_category_unknown() {
        let err = "velocity".parse::<Category>().unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidCategory(ref s) if s == "velocity"));
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Battery).unwrap();
        assert_eq!(json, "\"battery\"");
        let cat: Category = serde_json::from_str("\"position\"").unwrap();
        assert_eq!(cat, Category::Position);
    }

    #[test]
    fn test_field_value_untagged() {
        let num: FieldValue = serde_json::from_str("12.4").unwrap();
        assert_eq!(num, FieldValue::Number(12.4));

        let text: FieldValue = serde_json::from_str("\"GUIDED\"").unwrap();
        assert_eq!(text, FieldValue::Text("GUIDED".to_string()));

        assert_eq!(serde_json::to_string(&FieldValue::Number(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_sample_builder() {
        let sample = TelemetrySample::with_timestamp(Category::Battery, 1_700_000_000_000)
            .field("voltage_v", 12.4)
            .field("remaining_percent", 0.87);

        assert_eq!(sample.category, Category::Battery);
        assert_eq!(sample.timestamp, 1_700_000_000_000);
        assert_eq!(sample.fields.get("voltage_v").and_then(FieldValue::as_f64), Some(12.4));
    }
}

//! Simulated flight controller
//!
//! Publishes plausible position, attitude, and battery samples at the
//! configured rate: a slow orbit over a fixed home point, gentle attitude
//! oscillation, and a battery that drains over roughly an hour.

use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::IngressStatus;
use crate::config::IngressConfig;
use crate::telemetry::{Category, DistributionHub, TelemetrySample};

const HOME_LAT_DEG: f64 = 34.0522017;
const HOME_LON_DEG: f64 = -118.2436842;
const HOME_ALT_M: f64 = 120.0;
const ORBIT_RADIUS_DEG: f64 = 0.0005;
const ORBIT_PERIOD_S: f64 = 60.0;
const BATTERY_DRAIN_S: f64 = 3600.0;

/// Run the simulator loop; never returns under normal operation
pub async fn run(config: IngressConfig, hub: Arc<DistributionHub>, status: Arc<IngressStatus>) {
    let rate_hz = config.sample_rate_hz.max(0.1);
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / rate_hz));

    status.mark_connected().await;
    tracing::info!(rate_hz, "Simulated telemetry stream started");

    let mut tick: u64 = 0;
    loop {
        ticker.tick().await;

        let elapsed_s = tick as f64 / rate_hz;
        let timestamp = Utc::now().timestamp_millis();

        for sample in generate(elapsed_s, timestamp) {
            hub.publish(sample).await;
        }

        tick += 1;
    }
}

/// Generate one sample per category for a given flight time
fn generate(elapsed_s: f64, timestamp: i64) -> Vec<TelemetrySample> {
    let phase = 2.0 * PI * elapsed_s / ORBIT_PERIOD_S;

    let position = TelemetrySample::with_timestamp(Category::Position, timestamp)
        .field("latitude_deg", round(HOME_LAT_DEG + ORBIT_RADIUS_DEG * phase.sin(), 7))
        .field("longitude_deg", round(HOME_LON_DEG + ORBIT_RADIUS_DEG * phase.cos(), 7))
        .field("absolute_altitude_m", round(HOME_ALT_M + 5.0 * (phase / 3.0).sin(), 2))
        .field("relative_altitude_m", round(42.0 + 5.0 * (phase / 3.0).sin(), 2));

    let attitude = TelemetrySample::with_timestamp(Category::Attitude, timestamp)
        .field("roll_deg", round(3.0 * phase.sin(), 2))
        .field("pitch_deg", round(1.5 * (phase * 0.7).cos(), 2))
        .field("yaw_deg", round((phase.to_degrees() + 90.0).rem_euclid(360.0) - 180.0, 2));

    let remaining = (1.0 - elapsed_s / BATTERY_DRAIN_S).clamp(0.0, 1.0);
    let battery = TelemetrySample::with_timestamp(Category::Battery, timestamp)
        .field("voltage_v", round(10.8 + 1.8 * remaining, 2))
        .field("remaining_percent", round(remaining, 4));

    vec![position, attitude, battery]
}

fn round(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::FieldValue;

    fn field(sample: &TelemetrySample, key: &str) -> f64 {
        sample.fields.get(key).and_then(FieldValue::as_f64).unwrap()
    }

    #[test]
    fn test_generate_covers_all_categories() {
        let samples = generate(0.0, 1_700_000_000_000);
        let categories: Vec<Category> = samples.iter().map(|s| s.category).collect();
        assert_eq!(categories, vec![Category::Position, Category::Attitude, Category::Battery]);
        assert!(samples.iter().all(|s| s.timestamp == 1_700_000_000_000));
    }

    #[test]
    fn test_position_stays_near_home() {
        for t in [0.0, 15.0, 33.0, 59.0] {
            let samples = generate(t, 0);
            let lat = field(&samples[0], "latitude_deg");
            let lon = field(&samples[0], "longitude_deg");
            assert!((lat - HOME_LAT_DEG).abs() <= ORBIT_RADIUS_DEG + 1e-9);
            assert!((lon - HOME_LON_DEG).abs() <= ORBIT_RADIUS_DEG + 1e-9);
        }
    }

    #[test]
    fn test_battery_drains_monotonically() {
        let early = field(&generate(10.0, 0)[2], "remaining_percent");
        let late = field(&generate(1800.0, 0)[2], "remaining_percent");
        assert!(late < early);
        assert!((0.0..=1.0).contains(&late));

        // Fully drained after the drain window, never negative
        let empty = field(&generate(BATTERY_DRAIN_S * 2.0, 0)[2], "remaining_percent");
        assert_eq!(empty, 0.0);
    }

    #[test]
    fn test_yaw_within_half_turn() {
        for t in [0.0, 7.0, 120.0, 845.0] {
            let yaw = field(&generate(t, 0)[1], "yaw_deg");
            assert!((-180.0..180.0).contains(&yaw), "yaw out of range: {yaw}");
        }
    }
}

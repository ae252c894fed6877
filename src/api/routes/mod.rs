//! API Routes
//!
//! Handler functions grouped by endpoint area.

pub mod docs;
pub mod health;
pub mod status;
pub mod telemetry;

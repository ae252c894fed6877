//! Telemetry core error types

use thiserror::Error;

/// Errors from the distribution core
///
/// Staleness is not represented here: a rejected stale sample is a defined
/// outcome (`CategoryStore::update` returns `false`), not an error. Delivery
/// failures are likewise handled locally by evicting the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// An unknown category name was requested (client or config error)
    #[error("Unknown telemetry category: {0}")]
    InvalidCategory(String),

    /// Subscriber limit reached
    #[error("Too many subscribers (limit: {0})")]
    TooManySubscribers(usize),
}

/// Result type for telemetry core operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

//! Latest-value store
//!
//! Holds the most recent sample per category. Volatile by design: this is a
//! latest-value cache for live telemetry, not a log.

use std::collections::HashMap;
use tokio::sync::RwLock;

use super::types::{Category, TelemetrySample};

/// Thread-safe latest-sample-per-category store
///
/// One lock per category slot, so reads and writes on different categories
/// never contend. Readers get clones, never references into the slot.
pub struct CategoryStore {
    slots: HashMap<Category, RwLock<Option<TelemetrySample>>>,
}

impl CategoryStore {
    /// Create a store with an empty slot for every category
    pub fn new() -> Self {
        let slots = Category::all()
            .iter()
            .map(|cat| (*cat, RwLock::new(None)))
            .collect();
        Self { slots }
    }

    /// Apply a sample if it is strictly newer than the stored one
    ///
    /// Returns `true` if the sample was stored, `false` if it was rejected as
    /// stale (`timestamp <= stored timestamp`). A delayed retransmission must
    /// never overwrite a fresher reading.
    pub async fn update(&self, sample: TelemetrySample) -> bool {
        let mut slot = self.slot(sample.category).write().await;
        match slot.as_ref() {
            Some(current) if sample.timestamp <= current.timestamp => false,
            _ => {
                *slot = Some(sample);
                true
            }
        }
    }

    /// Read the latest sample for a category
    ///
    /// `None` means no sample has ever arrived - a defined "no data yet"
    /// result, not an error.
    pub async fn read(&self, category: Category) -> Option<TelemetrySample> {
        self.slot(category).read().await.clone()
    }

    /// Most recent accepted timestamp across all categories
    pub async fn last_updated(&self) -> Option<i64> {
        let mut latest = None;
        for cat in Category::all() {
            if let Some(sample) = self.slot(*cat).read().await.as_ref() {
                latest = Some(latest.map_or(sample.timestamp, |t: i64| t.max(sample.timestamp)));
            }
        }
        latest
    }

    fn slot(&self, category: Category) -> &RwLock<Option<TelemetrySample>> {
        // Invariant: new() creates a slot for every Category variant.
        self.slots
            .get(&category)
            .expect("store slot exists for every category")
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_empty() {
        let store = CategoryStore::new();
        assert!(store.read(Category::Position).await.is_none());
        assert!(store.last_updated().await.is_none());
    }

    #[tokio::test]
    async fn test_update_then_read() {
        let store = CategoryStore::new();
        let sample = TelemetrySample::with_timestamp(Category::Battery, 100).field("voltage_v", 12.4);

        assert!(store.update(sample.clone()).await);

        let read = store.read(Category::Battery).await.unwrap();
        assert_eq!(read, sample);
    }

    #[tokio::test]
    async fn test_stale_sample_rejected() {
        let store = CategoryStore::new();

        let fresh = TelemetrySample::with_timestamp(Category::Battery, 1).field("level", 80.0);
        let stale = TelemetrySample::with_timestamp(Category::Battery, 0).field("level", 75.0);

        assert!(store.update(fresh).await);
        assert!(!store.update(stale).await);

        let read = store.read(Category::Battery).await.unwrap();
        assert_eq!(read.timestamp, 1);
        assert_eq!(read.fields.get("level").and_then(|v| v.as_f64()), Some(80.0));
    }

    #[tokio::test]
    async fn test_equal_timestamp_rejected() {
        let store = CategoryStore::new();

        assert!(store.update(TelemetrySample::with_timestamp(Category::Attitude, 5)).await);
        assert!(!store.update(TelemetrySample::with_timestamp(Category::Attitude, 5)).await);
    }

    #[tokio::test]
    async fn test_categories_independent() {
        let store = CategoryStore::new();

        assert!(store.update(TelemetrySample::with_timestamp(Category::Position, 10)).await);
        // An older attitude sample is fine; staleness is per category.
        assert!(store.update(TelemetrySample::with_timestamp(Category::Attitude, 5)).await);

        assert_eq!(store.read(Category::Position).await.unwrap().timestamp, 10);
        assert_eq!(store.read(Category::Attitude).await.unwrap().timestamp, 5);
        assert!(store.read(Category::Battery).await.is_none());
    }

    #[tokio::test]
    async fn test_monotonic_sequence_keeps_max_accepted() {
        let store = CategoryStore::new();

        for ts in [3, 1, 7, 7, 4, 9, 2] {
            store.update(TelemetrySample::with_timestamp(Category::Position, ts)).await;
        }

        assert_eq!(store.read(Category::Position).await.unwrap().timestamp, 9);
        assert_eq!(store.last_updated().await, Some(9));
    }
}

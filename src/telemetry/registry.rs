//! Subscriber registry
//!
//! Tracks live subscribers and their category interests. The registry is the
//! single writer of the subscriber set; transports only hold opaque handles.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{TelemetryError, TelemetryResult};
use super::types::{Category, TelemetrySample};

/// Opaque handle identifying one subscriber
pub type SubscriberId = Uuid;

/// Error from an outbound sink delivery attempt
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving end is gone (client disconnected)
    #[error("sink closed")]
    Closed,
}

/// Destination for fanned-out samples
///
/// One operation: accept a single sample. Concrete transports implement this
/// as a queued channel send; the hub bounds each call with a delivery timeout,
/// so implementations may block until the consumer drains.
#[async_trait]
pub trait OutboundSink: Send + Sync {
    /// Deliver one sample to the subscriber
    async fn deliver(&self, sample: TelemetrySample) -> Result<(), SinkError>;
}

/// One registered subscriber
struct Subscriber {
    /// Categories this subscriber wants; empty means all
    interests: HashSet<Category>,
    /// Where fanned-out samples go
    sink: Arc<dyn OutboundSink>,
}

impl Subscriber {
    fn wants(&self, category: Category) -> bool {
        self.interests.is_empty() || self.interests.contains(&category)
    }
}

/// Tracks active subscribers and their interest filters
pub struct SubscriptionRegistry {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    max_subscribers: usize,
}

impl SubscriptionRegistry {
    /// Create an empty registry with a subscriber limit
    pub fn new(max_subscribers: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            max_subscribers,
        }
    }

    /// Register a new subscriber
    ///
    /// An empty interest set means "every category". The subscriber is visible
    /// to fan-out as soon as this returns: insertion happens under the write
    /// lock, so there is no window where a completed registration misses a
    /// publish.
    pub async fn subscribe(
        &self,
        interests: HashSet<Category>,
        sink: Arc<dyn OutboundSink>,
    ) -> TelemetryResult<SubscriberId> {
        let mut subs = self.subscribers.write().await;
        if subs.len() >= self.max_subscribers {
            return Err(TelemetryError::TooManySubscribers(self.max_subscribers));
        }

        let id = Uuid::new_v4();
        subs.insert(id, Subscriber { interests, sink });

        tracing::info!(subscriber_id = %id, "Subscriber registered");
        Ok(id)
    }

    /// Remove a subscriber
    ///
    /// Idempotent: unknown or already-removed handles are a no-op, since
    /// disconnect races with eviction are expected.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        if self.subscribers.write().await.remove(&id).is_some() {
            tracing::info!(subscriber_id = %id, "Subscriber removed");
        }
    }

    /// Replace a live subscriber's interest set
    ///
    /// Returns `false` if the handle is no longer registered.
    pub async fn set_interests(&self, id: SubscriberId, interests: HashSet<Category>) -> bool {
        let mut subs = self.subscribers.write().await;
        match subs.get_mut(&id) {
            Some(sub) => {
                tracing::debug!(subscriber_id = %id, interests = ?interests, "Interests updated");
                sub.interests = interests;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every subscriber interested in a category
    ///
    /// Collected under the read lock, so enumeration sees a consistent set;
    /// subscribers added or removed afterwards do not affect the result.
    pub async fn matching(&self, category: Category) -> Vec<(SubscriberId, Arc<dyn OutboundSink>)> {
        self.subscribers
            .read()
            .await
            .iter()
            .filter(|(_, sub)| sub.wants(category))
            .map(|(id, sub)| (*id, Arc::clone(&sub.sink)))
            .collect()
    }

    /// Current number of registered subscribers
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Whether any subscribers are registered
    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    /// Test sink backed by an unbounded channel
    struct TestSink {
        tx: mpsc::UnboundedSender<TelemetrySample>,
    }

    #[async_trait]
    impl OutboundSink for TestSink {
        async fn deliver(&self, sample: TelemetrySample) -> Result<(), SinkError> {
            self.tx.send(sample).map_err(|_| SinkError::Closed)
        }
    }

    fn test_sink() -> (Arc<dyn OutboundSink>, mpsc::UnboundedReceiver<TelemetrySample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(TestSink { tx }), rx)
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let registry = SubscriptionRegistry::new(16);
        let (sink, _rx) = test_sink();

        let id = registry.subscribe(HashSet::new(), sink).await.unwrap();
        assert_eq!(registry.len().await, 1);

        registry.unsubscribe(id).await;
        assert!(registry.is_empty().await);

        // Idempotent
        registry.unsubscribe(id).await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_subscriber_limit() {
        let registry = SubscriptionRegistry::new(1);
        let (sink1, _rx1) = test_sink();
        let (sink2, _rx2) = test_sink();

        registry.subscribe(HashSet::new(), sink1).await.unwrap();
        let err = registry.subscribe(HashSet::new(), sink2).await.unwrap_err();
        assert!(matches!(err, TelemetryError::TooManySubscribers(1)));
    }

    #[tokio::test]
    async fn test_matching_respects_interests() {
        let registry = SubscriptionRegistry::new(16);
        let (battery_sink, _rx1) = test_sink();
        let (all_sink, _rx2) = test_sink();

        registry
            .subscribe(HashSet::from([Category::Battery]), battery_sink)
            .await
            .unwrap();
        let all_id = registry.subscribe(HashSet::new(), all_sink).await.unwrap();

        let battery_targets = registry.matching(Category::Battery).await;
        assert_eq!(battery_targets.len(), 2);

        let position_targets = registry.matching(Category::Position).await;
        assert_eq!(position_targets.len(), 1);
        assert_eq!(position_targets[0].0, all_id);
    }

    #[tokio::test]
    async fn test_set_interests() {
        let registry = SubscriptionRegistry::new(16);
        let (sink, _rx) = test_sink();

        let id = registry
            .subscribe(HashSet::from([Category::Position]), sink)
            .await
            .unwrap();
        assert!(registry.matching(Category::Battery).await.is_empty());

        assert!(registry.set_interests(id, HashSet::from([Category::Battery])).await);
        assert_eq!(registry.matching(Category::Battery).await.len(), 1);
        assert!(registry.matching(Category::Position).await.is_empty());

        registry.unsubscribe(id).await;
        assert!(!registry.set_interests(id, HashSet::new()).await);
    }
}

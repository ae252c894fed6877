//! Telemetry distribution hub
//!
//! The central coordinator: ingestion -> latest-value store -> fan-out.
//! Composes one [`CategoryStore`] and one [`SubscriptionRegistry`]; transport
//! adapters only ever talk to the hub.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::TelemetryResult;
use super::registry::{OutboundSink, SubscriberId, SubscriptionRegistry};
use super::store::CategoryStore;
use super::types::{Category, TelemetrySample};

/// Configuration for the distribution hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent subscribers
    pub max_subscribers: usize,
    /// Time budget for delivering one sample to one subscriber
    pub delivery_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_subscribers: 1000,
            delivery_timeout: Duration::from_millis(500),
        }
    }
}

/// In-memory telemetry distribution core
///
/// Accepts published samples, keeps the latest per category, and fans accepted
/// samples out to matching subscribers. Safe to share across connection tasks
/// behind an `Arc`; all interior state is owned by the hub's two components.
pub struct DistributionHub {
    store: CategoryStore,
    registry: SubscriptionRegistry,
    config: HubConfig,
    /// Subscribers dropped after a failed or timed-out delivery
    evicted: AtomicU64,
}

impl DistributionHub {
    /// Create a hub with the given configuration
    pub fn new(config: HubConfig) -> Self {
        Self {
            store: CategoryStore::new(),
            registry: SubscriptionRegistry::new(config.max_subscribers),
            config,
            evicted: AtomicU64::new(0),
        }
    }

    /// Publish one sample: update the store, then fan out
    ///
    /// A stale sample (rejected by the store) returns 0 without notifying
    /// anyone - stale data must never reach a subscriber, since that would
    /// roll a display backwards. Deliveries run concurrently, each with its
    /// own bounded time budget, so one stuck subscriber costs at most one
    /// timeout and never delays the rest. A subscriber whose sink fails or
    /// times out is evicted and never blocks the publisher. Returns the
    /// number of subscribers actually delivered to.
    pub async fn publish(&self, sample: TelemetrySample) -> usize {
        let category = sample.category;
        if !self.store.update(sample.clone()).await {
            tracing::trace!(%category, timestamp = sample.timestamp, "Stale sample rejected");
            return 0;
        }

        let targets = self.registry.matching(category).await;
        if targets.is_empty() {
            return 0;
        }

        let timeout = self.config.delivery_timeout;
        let attempts = targets.into_iter().map(|(id, sink)| {
            let sample = sample.clone();
            async move {
                let result = tokio::time::timeout(timeout, sink.deliver(sample)).await;
                (id, result)
            }
        });

        let mut delivered = 0;
        let mut evict = Vec::new();

        for (id, result) in join_all(attempts).await {
            match result {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(subscriber_id = %id, error = %e, "Delivery failed, evicting subscriber");
                    evict.push(id);
                }
                Err(_) => {
                    tracing::warn!(
                        subscriber_id = %id,
                        timeout_ms = timeout.as_millis() as u64,
                        "Delivery timed out, evicting subscriber"
                    );
                    evict.push(id);
                }
            }
        }

        for id in evict {
            self.registry.unsubscribe(id).await;
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }

        tracing::trace!(%category, delivered, "Sample published");
        delivered
    }

    /// Latest sample for a category, or `None` if nothing has arrived yet
    ///
    /// Reads only the store; never blocks on subscriber state.
    pub async fn snapshot(&self, category: Category) -> Option<TelemetrySample> {
        self.store.read(category).await
    }

    /// Register a subscriber; empty interests means every category
    pub async fn subscribe(
        &self,
        interests: HashSet<Category>,
        sink: Arc<dyn OutboundSink>,
    ) -> TelemetryResult<SubscriberId> {
        self.registry.subscribe(interests, sink).await
    }

    /// Remove a subscriber; idempotent
    pub async fn unsubscribe(&self, id: SubscriberId) {
        self.registry.unsubscribe(id).await;
    }

    /// Replace a subscriber's interest set; `false` if no longer registered
    pub async fn set_interests(&self, id: SubscriberId, interests: HashSet<Category>) -> bool {
        self.registry.set_interests(id, interests).await
    }

    /// Current number of live subscribers
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }

    /// Total subscribers evicted after failed deliveries
    pub fn evicted_total(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Most recent accepted timestamp across all categories
    pub async fn last_updated(&self) -> Option<i64> {
        self.store.last_updated().await
    }
}

impl Default for DistributionHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

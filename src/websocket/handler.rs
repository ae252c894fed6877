//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and the connection lifecycle. Each
//! connection gets a bounded outbound queue registered with the hub as an
//! [`OutboundSink`]; a client that stops draining the queue is evicted by the
//! hub's delivery timeout.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::telemetry::{
    Category, DistributionHub, OutboundSink, SinkError, SubscriberId, TelemetrySample,
};

/// Hub sink backed by a connection's bounded outbound queue
///
/// `deliver` blocks while the queue is full; the hub's per-subscriber timeout
/// turns a persistently backed-up client into an eviction.
struct ChannelSink {
    tx: mpsc::Sender<ServerMessage>,
}

#[async_trait::async_trait]
impl OutboundSink for ChannelSink {
    async fn deliver(&self, sample: TelemetrySample) -> Result<(), SinkError> {
        self.tx
            .send(ServerMessage::telemetry(sample))
            .await
            .map_err(|_| SinkError::Closed)
    }
}

/// WebSocket upgrade handler, the entry point for streaming connections
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Bounded queue between the hub and this connection
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.config.ws_outbound_capacity);
    let sink = Arc::new(ChannelSink { tx: tx.clone() });

    // New connections start on the full feed (empty interest set = all)
    let subscriber_id = match state.hub.subscribe(HashSet::new(), sink).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected WebSocket connection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Ok(text) = serde_json::to_string(&error_msg) {
                let _ = sender.send(Message::Text(text)).await;
            }
            return;
        }
    };

    let connected_msg = ServerMessage::Connected {
        subscriber_id: subscriber_id.to_string(),
    };
    let connected_text = match serde_json::to_string(&connected_msg) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize connected message");
            state.hub.unsubscribe(subscriber_id).await;
            return;
        }
    };
    if sender.send(Message::Text(connected_text)).await.is_err() {
        state.hub.unsubscribe(subscriber_id).await;
        return;
    }

    // Forward queued messages to the socket
    let send_id = subscriber_id;
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(subscriber_id = %send_id, "WebSocket send failed, closing");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    // Process incoming client messages
    let recv_hub = Arc::clone(&state.hub);
    let recv_id = subscriber_id;
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&recv_hub, recv_id, &tx, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(subscriber_id = %recv_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    state.hub.unsubscribe(subscriber_id).await;
}

/// Handle one received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &Arc<DistributionHub>,
    subscriber_id: SubscriberId,
    tx: &mpsc::Sender<ServerMessage>,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(hub, subscriber_id, tx, client_msg).await;
                }
                Err(e) => {
                    tracing::debug!(
                        subscriber_id = %subscriber_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = tx.send(error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = tx.send(error_msg).await;
            true
        }
        // Axum answers pings automatically; a pong just confirms liveness
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(subscriber_id = %subscriber_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
async fn handle_client_message(
    hub: &Arc<DistributionHub>,
    subscriber_id: SubscriberId,
    tx: &mpsc::Sender<ServerMessage>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::Subscribe { categories } => {
            let (interests, confirmed) = parse_interests(&categories);

            if hub.set_interests(subscriber_id, interests).await {
                let _ = tx.send(ServerMessage::Subscribed { categories: confirmed }).await;
            } else {
                // Raced with eviction; the connection is on its way down
                tracing::debug!(subscriber_id = %subscriber_id, "Subscribe for unregistered handle");
            }
        }
        ClientMessage::Ping => {
            let _ = tx.send(ServerMessage::Pong).await;
        }
    }
}

/// Resolve requested category names to an interest set
///
/// An empty list or the name "all" means the full feed (empty set). Unknown
/// names are skipped with a warning rather than failing the request. The
/// second element lists the resolved categories for the confirmation message.
fn parse_interests(names: &[String]) -> (HashSet<Category>, Vec<Category>) {
    if names.is_empty() || names.iter().any(|n| n == "all") {
        return (HashSet::new(), Vec::new());
    }

    let mut interests = HashSet::new();
    let mut confirmed = Vec::new();

    for name in names {
        match name.parse::<Category>() {
            Ok(category) => {
                if interests.insert(category) {
                    confirmed.push(category);
                }
            }
            Err(_) => {
                tracing::warn!(category = %name, "Unknown category in subscribe request, ignored");
            }
        }
    }

    (interests, confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_interests_specific() {
        let (interests, confirmed) = parse_interests(&names(&["position", "battery"]));
        assert_eq!(interests, HashSet::from([Category::Position, Category::Battery]));
        assert_eq!(confirmed, vec![Category::Position, Category::Battery]);
    }

    #[test]
    fn test_parse_interests_all_keyword() {
        let (interests, confirmed) = parse_interests(&names(&["position", "all"]));
        assert!(interests.is_empty());
        assert!(confirmed.is_empty());
    }

    #[test]
    fn test_parse_interests_empty() {
        let (interests, _) = parse_interests(&[]);
        assert!(interests.is_empty());
    }

    #[test]
    fn test_parse_interests_skips_unknown() {
        let (interests, confirmed) = parse_interests(&names(&["battery", "velocity"]));
        assert_eq!(interests, HashSet::from([Category::Battery]));
        assert_eq!(confirmed, vec![Category::Battery]);
    }

    #[test]
    fn test_parse_interests_dedup() {
        let (interests, confirmed) = parse_interests(&names(&["battery", "battery"]));
        assert_eq!(interests.len(), 1);
        assert_eq!(confirmed.len(), 1);
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (tx, rx) = mpsc::channel(1);
        let sink = ChannelSink { tx };
        drop(rx);

        let result = sink
            .deliver(TelemetrySample::with_timestamp(Category::Battery, 1))
            .await;
        assert!(matches!(result, Err(SinkError::Closed)));
    }
}

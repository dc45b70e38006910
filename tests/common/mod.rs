// Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use trade_board::aggregator::AggregatorStatus;
use trade_board::feed::{session_stream, BatchStream, FeedConnector, FeedEvent, SessionMessage};
use trade_board::types::{PlanetId, ProductType, TradeEvent, TradeId, TransactionType};

pub fn trade(id: &str, planet: &str, volume: f64) -> TradeEvent {
    TradeEvent {
        id: TradeId::from(id),
        planet_id: PlanetId::from(planet),
        product: ProductType::Energy,
        transaction_type: TransactionType::Buy,
        timestamp: "2026-01-18T20:00:00Z".parse().unwrap(),
        volume,
        price_per_unit: 5.0,
    }
}

pub fn ids(events: &[TradeEvent]) -> Vec<String> {
    events.iter().map(|e| e.id.to_string()).collect()
}

#[derive(Default)]
struct FeedInner {
    sender: Option<broadcast::Sender<SessionMessage>>,
    // Senders of disconnected sessions; kept so late items still reach
    // subscriptions that were replaced or stopped.
    retired: Vec<broadcast::Sender<SessionMessage>>,
    opened: usize,
    disconnects: usize,
}

/// Test-side handle for pushing items into a [`ChannelFeedConnector`].
#[derive(Clone, Default)]
pub struct FeedHandle {
    inner: Arc<Mutex<FeedInner>>,
}

impl FeedHandle {
    fn send(&self, message: SessionMessage) {
        let inner = self.inner.lock();
        for sender in inner.sender.iter().chain(inner.retired.iter()) {
            let _ = sender.send(message.clone());
        }
    }

    pub fn push(&self, batch: Vec<TradeEvent>) {
        self.send(SessionMessage::Event(FeedEvent::Batch(batch)));
    }

    pub fn fail(&self, reason: &str) {
        self.send(SessionMessage::Event(FeedEvent::Error(reason.to_string())));
    }

    /// Ends the session as if retries had run out.
    pub fn close(&self) {
        self.send(SessionMessage::Closed);
        self.inner.lock().sender = None;
    }

    pub fn opened(&self) -> usize {
        self.inner.lock().opened
    }

    pub fn disconnects(&self) -> usize {
        self.inner.lock().disconnects
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().sender.is_some()
    }
}

/// In-memory connector with the same session semantics as the WebSocket one.
pub struct ChannelFeedConnector {
    handle: FeedHandle,
}

impl ChannelFeedConnector {
    pub fn new() -> (Self, FeedHandle) {
        let handle = FeedHandle::default();
        (ChannelFeedConnector { handle: handle.clone() }, handle)
    }
}

impl FeedConnector for ChannelFeedConnector {
    fn connect(&mut self) -> BatchStream {
        let mut inner = self.handle.inner.lock();
        let existing = inner.sender.as_ref().map(|sender| sender.subscribe());
        let receiver = match existing {
            Some(receiver) => receiver,
            None => {
                let (sender, receiver) = broadcast::channel(1024);
                inner.sender = Some(sender);
                inner.opened += 1;
                receiver
            }
        };
        session_stream(receiver)
    }

    fn disconnect(&mut self) {
        let mut inner = self.handle.inner.lock();
        if let Some(sender) = inner.sender.take() {
            inner.retired.push(sender);
            inner.disconnects += 1;
        }
    }

    fn is_connected(&self) -> bool {
        self.handle.is_open()
    }

    fn last_error(&self) -> Option<String> {
        None
    }

    fn source_id(&self) -> &str {
        "channel"
    }
}

/// Waits (bounded) until the published status satisfies `predicate`.
pub async fn wait_for_status<F>(
    status: &mut watch::Receiver<AggregatorStatus>,
    predicate: F,
) -> AggregatorStatus
where
    F: FnMut(&AggregatorStatus) -> bool,
{
    let seen = tokio::time::timeout(Duration::from_secs(5), status.wait_for(predicate))
        .await
        .expect("timed out waiting for aggregator status")
        .expect("status channel closed");
    seen.clone()
}

/// Lets the subscription task drain anything already queued.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub mod backoff;
pub mod connectors;

use std::pin::Pin;
use futures_util::stream::Stream;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use crate::types::TradeEvent;

pub use backoff::Backoff;
pub use connectors::FeedConnector;

/// Item delivered to feed subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// Trades received during one buffering interval, in arrival order.
    Batch(Vec<TradeEvent>),
    /// Transport failure; the connector may still reconnect.
    Error(String),
}

/// Ends when the connector gives up or is disconnected.
pub type BatchStream = Pin<Box<dyn Stream<Item = FeedEvent> + Send>>;

/// Messages fanned out by a connector session to every subscriber.
#[derive(Clone, Debug)]
pub enum SessionMessage {
    Event(FeedEvent),
    /// Terminal marker sent when the session stops on its own.
    Closed,
}

/// Adapts a session's broadcast receiver into a subscriber stream.
pub fn session_stream(receiver: broadcast::Receiver<SessionMessage>) -> BatchStream {
    let stream = BroadcastStream::new(receiver)
        .take_while(|message| !matches!(message, Ok(SessionMessage::Closed)))
        .filter_map(|message| match message {
            Ok(SessionMessage::Event(event)) => Some(event),
            Ok(SessionMessage::Closed) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped = skipped, "Feed subscriber lagged, batches skipped");
                None
            }
        });

    Box::pin(stream)
}

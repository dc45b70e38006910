pub mod websocket;

use crate::feed::BatchStream;

pub use websocket::WebSocketFeedConnector;

/// Source of micro-batched trade events.
///
/// `connect` only registers interest and returns immediately; batches are
/// delivered through the returned stream. Calling it while a session is open
/// hands out another subscription to that same session.
pub trait FeedConnector: Send {
    fn connect(&mut self) -> BatchStream;
    /// Closes the active session. Safe to call when not connected.
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    fn last_error(&self) -> Option<String>;
    fn source_id(&self) -> &str;
}

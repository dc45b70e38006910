use std::sync::Arc;
use std::time::Duration;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn, Instrument};
use crate::config::{BackoffConfig, FeedConfig};
use crate::error::{Error, Result};
use crate::feed::{session_stream, Backoff, BatchStream, FeedConnector, FeedEvent, SessionMessage};
use crate::observability::logging::trace_feed_session;
use crate::observability::metrics;
use crate::types::TradeEvent;

struct Session {
    sender: broadcast::Sender<SessionMessage>,
    task: JoinHandle<()>,
}

/// Streams trades from a WebSocket endpoint, batching them per buffer
/// interval and reconnecting with capped exponential backoff.
pub struct WebSocketFeedConnector {
    source_id: String,
    config: FeedConfig,
    session: Option<Session>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl WebSocketFeedConnector {
    pub fn new(config: FeedConfig) -> Self {
        WebSocketFeedConnector {
            source_id: "websocket".to_string(),
            config,
            session: None,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    fn open_session(&mut self) -> broadcast::Receiver<SessionMessage> {
        let endpoint = self.config.endpoint();
        let (sender, receiver) = broadcast::channel(self.config.channel_capacity);
        *self.last_error.lock() = None;

        let span = trace_feed_session(&endpoint);
        let task = tokio::spawn(
            run_session(
                endpoint.clone(),
                self.config.buffer_interval(),
                self.config.backoff.clone(),
                sender.clone(),
                self.last_error.clone(),
            )
            .instrument(span),
        );

        info!(endpoint = %endpoint, "Opened trade feed session");
        self.session = Some(Session { sender, task });
        receiver
    }
}

impl FeedConnector for WebSocketFeedConnector {
    fn connect(&mut self) -> BatchStream {
        let existing = if self.is_connected() {
            self.session.as_ref().map(|session| session.sender.subscribe())
        } else {
            None
        };
        let receiver = match existing {
            Some(receiver) => receiver,
            None => self.open_session(),
        };
        session_stream(receiver)
    }

    fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.task.abort();
            info!(endpoint = %self.config.endpoint(), "Closed trade feed session");
        }
    }

    fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.task.is_finished())
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl Drop for WebSocketFeedConnector {
    fn drop(&mut self) {
        self.disconnect();
    }
}

async fn run_session(
    endpoint: String,
    buffer_interval: Duration,
    backoff_config: BackoffConfig,
    sender: broadcast::Sender<SessionMessage>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    let mut backoff = Backoff::new(backoff_config);

    loop {
        match stream_batches(&endpoint, buffer_interval, &sender, &mut backoff, &last_error).await {
            Ok(()) => {
                info!("Trade feed closed by server");
                break;
            }
            Err(e) => {
                let reason = e.to_string();
                metrics::FEED_ERRORS.inc();
                warn!(error = %reason, "Trade feed transport error");

                *last_error.lock() = Some(reason.clone());
                let _ = sender.send(SessionMessage::Event(FeedEvent::Error(reason)));

                match backoff.next_delay() {
                    Some(delay) => {
                        metrics::RECONNECT_ATTEMPTS.inc();
                        warn!(
                            attempt = backoff.retry_count(),
                            max = backoff.max_retries(),
                            delay_ms = delay.as_millis() as u64,
                            "Reconnecting"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        error!(
                            error = %Error::MaxReconnectAttemptsExceeded(backoff.max_retries()),
                            "Giving up on trade feed"
                        );
                        break;
                    }
                }
            }
        }
    }

    let _ = sender.send(SessionMessage::Closed);
}

/// One connection: reads until the socket closes or fails, flushing the
/// pending batch on every tick of `buffer_interval`.
async fn stream_batches(
    endpoint: &str,
    buffer_interval: Duration,
    sender: &broadcast::Sender<SessionMessage>,
    backoff: &mut Backoff,
    last_error: &Mutex<Option<String>>,
) -> Result<()> {
    let (mut ws_stream, _) = connect_async(endpoint).await?;
    info!(endpoint = endpoint, "Connected to trade feed");

    let mut ticker = tokio::time::interval(buffer_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut pending: Vec<TradeEvent> = Vec::new();

    loop {
        tokio::select! {
            message = ws_stream.next() => match message {
                Some(Ok(Message::Text(text))) => decode_into(&text, &mut pending),
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => decode_into(text, &mut pending),
                    Err(e) => {
                        metrics::UNDECODABLE_MESSAGES.inc();
                        debug!(error = %e, "Dropping non-UTF-8 feed message");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    flush(&mut pending, sender, backoff, last_error);
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    flush(&mut pending, sender, backoff, last_error);
                    return Err(e.into());
                }
            },
            _ = ticker.tick() => flush(&mut pending, sender, backoff, last_error),
        }
    }
}

fn decode_into(text: &str, pending: &mut Vec<TradeEvent>) {
    match TradeEvent::from_json(text) {
        Ok(event) => pending.push(event),
        Err(e) => {
            metrics::UNDECODABLE_MESSAGES.inc();
            debug!(error = %e, "Dropping undecodable feed message");
        }
    }
}

fn flush(
    pending: &mut Vec<TradeEvent>,
    sender: &broadcast::Sender<SessionMessage>,
    backoff: &mut Backoff,
    last_error: &Mutex<Option<String>>,
) {
    if pending.is_empty() {
        return;
    }

    let batch = std::mem::take(pending);
    debug!(size = batch.len(), "Flushing trade batch");
    let _ = sender.send(SessionMessage::Event(FeedEvent::Batch(batch)));
    backoff.record_success();
    *last_error.lock() = None;
}

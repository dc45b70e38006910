use serde::Serialize;
use tracing::{debug, warn};
use crate::aggregator::leaderboard::compute_leaderboard;
use crate::aggregator::window::TransactionWindow;
use crate::feed::FeedEvent;
use crate::observability::metrics;
use crate::types::{ConnectionState, LeaderboardEntry, TradeEvent};

/// Read-only summary published to observers after every change.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AggregatorStatus {
    pub connected: bool,
    pub error: Option<String>,
    pub connection: ConnectionState,
    pub window_len: usize,
    pub leaderboard_len: usize,
    /// Bumped on every observable change.
    pub version: u64,
}

/// Outcome of handing a feed item to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Ignored,
    /// Item came from a subscription that has since been replaced or stopped.
    Stale,
}

/// Window, leaderboard and connection flags behind the aggregator.
#[derive(Debug)]
pub struct AggregatorState {
    window: TransactionWindow,
    leaderboard: Vec<LeaderboardEntry>,
    connected: bool,
    error: Option<String>,
    connection: ConnectionState,
    generation: u64,
    version: u64,
}

impl AggregatorState {
    pub fn new(capacity: usize) -> Self {
        AggregatorState {
            window: TransactionWindow::new(capacity),
            leaderboard: Vec::new(),
            connected: false,
            error: None,
            connection: ConnectionState::Idle,
            generation: 0,
            version: 0,
        }
    }

    /// Opens a new subscription generation and returns its number.
    pub fn begin_watch(&mut self) -> u64 {
        self.generation += 1;
        self.connected = true;
        self.error = None;
        self.connection = ConnectionState::Connecting;
        self.version += 1;
        self.generation
    }

    /// Invalidates the current generation. Returns whether anything visible changed.
    pub fn end_watch(&mut self) -> bool {
        self.generation += 1;

        let connection = match self.connection {
            ConnectionState::Idle => ConnectionState::Idle,
            _ => ConnectionState::Closed,
        };
        if !self.connected && self.connection == connection {
            return false;
        }

        self.connected = false;
        self.connection = connection;
        self.version += 1;
        true
    }

    pub fn apply(&mut self, generation: u64, event: FeedEvent) -> Delivery {
        if generation != self.generation {
            return Delivery::Stale;
        }

        match event {
            FeedEvent::Batch(batch) => self.apply_batch(batch),
            FeedEvent::Error(reason) => {
                self.apply_error(reason);
                Delivery::Applied
            }
        }
    }

    /// Stream for `generation` ended. Returns whether anything visible changed.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }

        debug!(generation = generation, "Trade feed subscription completed");
        self.connected = false;
        self.connection = ConnectionState::Closed;
        self.version += 1;
        true
    }

    fn apply_batch(&mut self, batch: Vec<TradeEvent>) -> Delivery {
        if batch.is_empty() {
            return Delivery::Ignored;
        }

        let received = batch.len();
        let valid: Vec<TradeEvent> = batch
            .into_iter()
            .filter(|event| match event.validate() {
                Ok(()) => true,
                Err(e) => {
                    metrics::INVALID_EVENTS_DROPPED.inc();
                    warn!(error = %e, "Dropping invalid trade event");
                    false
                }
            })
            .collect();

        if valid.is_empty() {
            return Delivery::Ignored;
        }

        let accepted = valid.len();
        let evicted = self.window.ingest(valid);

        let timer = metrics::LEADERBOARD_RECOMPUTE_LATENCY.start_timer();
        self.leaderboard = compute_leaderboard(self.window.iter());
        timer.observe_duration();

        metrics::BATCHES_INGESTED.inc();
        metrics::EVENTS_INGESTED.inc_by(accepted as u64);
        metrics::EVENTS_EVICTED.inc_by(evicted as u64);
        metrics::WINDOW_SIZE.set(self.window.len() as i64);

        debug!(
            received = received,
            accepted = accepted,
            evicted = evicted,
            window = self.window.len(),
            "Applied trade batch"
        );

        self.connected = true;
        self.error = None;
        self.connection = ConnectionState::Connected;
        self.version += 1;
        Delivery::Applied
    }

    fn apply_error(&mut self, reason: String) {
        warn!(error = %reason, "Trade feed reported an error");
        self.connected = false;
        self.connection = ConnectionState::Error(reason.clone());
        self.error = Some(reason);
        self.version += 1;
    }

    /// Back to the initial empty state.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.window.clear();
        self.leaderboard.clear();
        self.connected = false;
        self.error = None;
        self.connection = ConnectionState::Idle;
        self.version += 1;
        metrics::WINDOW_SIZE.set(0);
    }

    pub fn status(&self) -> AggregatorStatus {
        AggregatorStatus {
            connected: self.connected,
            error: self.error.clone(),
            connection: self.connection.clone(),
            window_len: self.window.len(),
            leaderboard_len: self.leaderboard.len(),
            version: self.version,
        }
    }

    pub fn transactions(&self) -> Vec<TradeEvent> {
        self.window.to_vec()
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn window(&self) -> &TransactionWindow {
        &self.window
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

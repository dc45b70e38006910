use std::sync::Arc;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, Instrument};
use crate::aggregator::state::{AggregatorState, AggregatorStatus, Delivery};
use crate::config::AggregatorConfig;
use crate::feed::{BatchStream, FeedConnector};
use crate::observability::logging::trace_subscription;
use crate::types::{ConnectionState, LeaderboardEntry, TradeEvent};

/// Keeps a bounded, newest-first window of trades from a feed connector and
/// the per-planet leaderboard derived from it.
///
/// Must be driven from within a tokio runtime: `start_watching` spawns the
/// task that consumes the feed.
pub struct TransactionAggregator<C: FeedConnector> {
    connector: C,
    state: Arc<Mutex<AggregatorState>>,
    status_tx: Arc<watch::Sender<AggregatorStatus>>,
    subscription: Option<JoinHandle<()>>,
}

impl<C: FeedConnector> TransactionAggregator<C> {
    pub fn new(connector: C, config: AggregatorConfig) -> Self {
        let state = AggregatorState::new(config.capacity);
        let (status_tx, _) = watch::channel(state.status());

        TransactionAggregator {
            connector,
            state: Arc::new(Mutex::new(state)),
            status_tx: Arc::new(status_tx),
            subscription: None,
        }
    }

    /// Subscribes to the connector. An existing subscription is disposed
    /// first, so at most one task ever feeds the window.
    pub fn start_watching(&mut self) {
        let generation = {
            let mut state = self.state.lock();
            let generation = state.begin_watch();
            self.status_tx.send_replace(state.status());
            generation
        };
        self.dispose_subscription();

        let stream = self.connector.connect();
        let task = tokio::spawn(
            consume(stream, generation, self.state.clone(), self.status_tx.clone())
                .instrument(trace_subscription(generation)),
        );
        self.subscription = Some(task);

        info!(
            source = self.connector.source_id(),
            generation = generation,
            "Started watching trade feed"
        );
    }

    /// Disconnects but keeps the window and leaderboard for display.
    pub fn stop_watching(&mut self) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.end_watch();
            if changed {
                self.status_tx.send_replace(state.status());
            }
            changed
        };
        self.dispose_subscription();
        self.connector.disconnect();

        if changed {
            info!(source = self.connector.source_id(), "Stopped watching trade feed");
        }
    }

    /// Disconnects and drops all retained data.
    pub fn reset(&mut self) {
        self.stop_watching();

        let mut state = self.state.lock();
        state.reset();
        self.status_tx.send_replace(state.status());
        info!("Transaction aggregator reset");
    }

    /// Newest first.
    pub fn transactions(&self) -> Vec<TradeEvent> {
        self.state.lock().transactions()
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.state.lock().leaderboard().to_vec()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().is_connected()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error().map(str::to_string)
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.lock().connection_state().clone()
    }

    pub fn status(&self) -> AggregatorStatus {
        self.state.lock().status()
    }

    pub fn is_watching(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Receives a fresh status after every change.
    pub fn subscribe(&self) -> watch::Receiver<AggregatorStatus> {
        self.status_tx.subscribe()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().window().capacity()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn dispose_subscription(&mut self) {
        if let Some(task) = self.subscription.take() {
            task.abort();
        }
    }
}

impl<C: FeedConnector> Drop for TransactionAggregator<C> {
    fn drop(&mut self) {
        self.dispose_subscription();
    }
}

async fn consume(
    mut stream: BatchStream,
    generation: u64,
    state: Arc<Mutex<AggregatorState>>,
    status_tx: Arc<watch::Sender<AggregatorStatus>>,
) {
    while let Some(event) = stream.next().await {
        let mut guard = state.lock();
        match guard.apply(generation, event) {
            Delivery::Applied => {
                status_tx.send_replace(guard.status());
            }
            Delivery::Ignored => {}
            Delivery::Stale => return,
        }
    }

    let mut guard = state.lock();
    if guard.complete(generation) {
        status_tx.send_replace(guard.status());
    }
}

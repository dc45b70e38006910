use lazy_static::lazy_static;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntGauge, Registry,
};
use crate::error::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Ingestion metrics
    pub static ref BATCHES_INGESTED: IntCounter = IntCounter::new(
        "batches_ingested_total",
        "Total number of non-empty trade batches applied to the window"
    ).expect("metric definition is valid");

    pub static ref EVENTS_INGESTED: IntCounter = IntCounter::new(
        "events_ingested_total",
        "Total number of trade events applied to the window"
    ).expect("metric definition is valid");

    pub static ref EVENTS_EVICTED: IntCounter = IntCounter::new(
        "events_evicted_total",
        "Total number of trade events dropped from the tail of the window"
    ).expect("metric definition is valid");

    pub static ref INVALID_EVENTS_DROPPED: IntCounter = IntCounter::new(
        "invalid_events_dropped_total",
        "Trade events rejected by validation before ingestion"
    ).expect("metric definition is valid");

    pub static ref UNDECODABLE_MESSAGES: IntCounter = IntCounter::new(
        "undecodable_messages_total",
        "Feed messages that could not be decoded into a trade event"
    ).expect("metric definition is valid");

    pub static ref WINDOW_SIZE: IntGauge = IntGauge::new(
        "transaction_window_size",
        "Current number of trades held in the window"
    ).expect("metric definition is valid");

    // Feed metrics
    pub static ref FEED_ERRORS: IntCounter = IntCounter::new(
        "feed_errors_total",
        "Transport errors surfaced by the feed connector"
    ).expect("metric definition is valid");

    pub static ref RECONNECT_ATTEMPTS: IntCounter = IntCounter::new(
        "feed_reconnect_attempts_total",
        "Reconnect attempts scheduled by the backoff policy"
    ).expect("metric definition is valid");

    // Latency metrics
    pub static ref LEADERBOARD_RECOMPUTE_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "leaderboard_recompute_latency_seconds",
            "Time spent rebuilding the leaderboard after a batch"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05])
    ).expect("metric definition is valid");
}

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(BATCHES_INGESTED.clone()))?;
    REGISTRY.register(Box::new(EVENTS_INGESTED.clone()))?;
    REGISTRY.register(Box::new(EVENTS_EVICTED.clone()))?;
    REGISTRY.register(Box::new(INVALID_EVENTS_DROPPED.clone()))?;
    REGISTRY.register(Box::new(UNDECODABLE_MESSAGES.clone()))?;
    REGISTRY.register(Box::new(WINDOW_SIZE.clone()))?;
    REGISTRY.register(Box::new(FEED_ERRORS.clone()))?;
    REGISTRY.register(Box::new(RECONNECT_ATTEMPTS.clone()))?;
    REGISTRY.register(Box::new(LEADERBOARD_RECOMPUTE_LATENCY.clone()))?;
    Ok(())
}

/// Text exposition of every registered metric.
pub fn gather_text() -> Result<String> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| crate::error::Error::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_metrics_are_exported() {
        register_metrics().unwrap();
        BATCHES_INGESTED.inc();

        let text = gather_text().unwrap();

        assert!(text.contains("batches_ingested_total"));
        assert!(text.contains("transaction_window_size"));
        assert!(matches!(register_metrics(), Err(crate::error::Error::MetricsError(_))));
    }
}

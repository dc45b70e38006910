use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the trade feed; `/transactions` is appended.
    pub url: String,
    pub buffer_interval_ms: u64,
    /// Batches buffered per subscriber before a slow reader starts lagging.
    pub channel_capacity: usize,
    pub backoff: BackoffConfig,
}

impl FeedConfig {
    pub fn buffer_interval(&self) -> Duration {
        Duration::from_millis(self.buffer_interval_ms)
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), crate::TRANSACTIONS_PATH)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: "ws://127.0.0.1:9100".to_string(),
            buffer_interval_ms: 500,
            channel_capacity: 64,
            backoff: BackoffConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_retries: u32,
    pub reset_on_success: bool,
}

impl BackoffConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_retries: 10,
            reset_on_success: true,
        }
    }
}

use std::time::Duration;
use tracing::debug;
use crate::config::BackoffConfig;

/// Capped exponential backoff: `min(initial * 2^attempt, max)`, attempts
/// numbered from 1. Owned by a single feed session.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    retry_count: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Backoff {
            config,
            retry_count: 0,
        }
    }

    /// Delay before the given retry attempt, without touching state.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max = self.config.max_delay();
        1u32.checked_shl(attempt)
            .and_then(|factor| self.config.initial_delay().checked_mul(factor))
            .map_or(max, |delay| delay.min(max))
    }

    /// Consumes one retry. `None` once `max_retries` have been used.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.retry_count >= self.config.max_retries {
            return None;
        }

        self.retry_count += 1;
        let delay = self.delay_for(self.retry_count);

        debug!(
            attempt = self.retry_count,
            delay_ms = delay.as_millis() as u64,
            "Calculated reconnect delay"
        );

        Some(delay)
    }

    /// Called after a batch has been delivered on the current connection.
    pub fn record_success(&mut self) {
        if self.config.reset_on_success && self.retry_count > 0 {
            debug!(retries = self.retry_count, "Backoff reset after successful batch");
            self.retry_count = 0;
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.config.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_retries: u32, reset_on_success: bool) -> BackoffConfig {
        BackoffConfig {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_retries,
            reset_on_success,
        }
    }

    #[test]
    fn test_exponential_delays_are_capped() {
        let backoff = Backoff::new(config(10, true));

        assert_eq!(backoff.delay_for(1), Duration::from_secs(2));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(4));
        assert_eq!(backoff.delay_for(4), Duration::from_secs(16));
        assert_eq!(backoff.delay_for(5), Duration::from_secs(30));
        assert_eq!(backoff.delay_for(10), Duration::from_secs(30));
        assert_eq!(backoff.delay_for(64), Duration::from_secs(30));
    }

    #[test]
    fn test_retries_run_out() {
        let mut backoff = Backoff::new(config(3, true));

        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(4)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(8)));
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.retry_count(), 3);
    }

    #[test]
    fn test_reset_on_success() {
        let mut backoff = Backoff::new(config(3, true));
        backoff.next_delay();
        backoff.next_delay();

        backoff.record_success();

        assert_eq!(backoff.retry_count(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_success_does_not_reset_when_disabled() {
        let mut backoff = Backoff::new(config(3, false));
        backoff.next_delay();
        backoff.next_delay();

        backoff.record_success();

        assert_eq!(backoff.retry_count(), 2);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(8)));
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_zero_retries() {
        let mut backoff = Backoff::new(config(0, true));
        assert_eq!(backoff.next_delay(), None);
    }
}

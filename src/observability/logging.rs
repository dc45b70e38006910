use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Installs the global subscriber. `RUST_LOG` wins over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::ConfigError(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::ConfigError(format!("logging already initialised: {}", e)))
}

pub fn trace_feed_session(endpoint: &str) -> Span {
    tracing::info_span!(
        "feed_session",
        endpoint = %endpoint,
    )
}

pub fn trace_subscription(generation: u64) -> Span {
    tracing::info_span!(
        "aggregator_subscription",
        generation = generation,
    )
}

use crate::config::*;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub aggregator: AggregatorConfig,
    pub simulator: SimulatorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layers `config/default`, `config/{env}` and `TRADEBOARD__*` variables.
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TRADEBOARD").separator("__"))
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let app: AppConfig = toml::from_str(text)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        if self.aggregator.capacity == 0 {
            return Err(Error::ConfigError("aggregator.capacity must be positive".into()));
        }
        if self.feed.buffer_interval_ms == 0 {
            return Err(Error::ConfigError("feed.buffer_interval_ms must be positive".into()));
        }
        if self.feed.channel_capacity == 0 {
            return Err(Error::ConfigError("feed.channel_capacity must be positive".into()));
        }
        if self.feed.backoff.initial_delay_ms > self.feed.backoff.max_delay_ms {
            return Err(Error::ConfigError(
                "feed.backoff.initial_delay_ms exceeds max_delay_ms".into(),
            ));
        }
        if self.simulator.enabled && self.simulator.planets.is_empty() {
            return Err(Error::ConfigError("simulator.planets must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_feed_contract() {
        let config = AppConfig::default();

        assert_eq!(config.aggregator.capacity, 10_000);
        assert_eq!(config.feed.buffer_interval_ms, 500);
        assert_eq!(config.feed.backoff.initial_delay_ms, 1_000);
        assert_eq!(config.feed.backoff.max_delay_ms, 30_000);
        assert_eq!(config.feed.backoff.max_retries, 10);
        assert!(config.feed.backoff.reset_on_success);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [aggregator]
            capacity = 250

            [feed]
            url = "ws://feed.example:8080/"

            [feed.backoff]
            max_retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.aggregator.capacity, 250);
        assert_eq!(config.feed.endpoint(), "ws://feed.example:8080/transactions");
        assert_eq!(config.feed.backoff.max_retries, 3);
        assert_eq!(config.feed.backoff.max_delay_ms, 30_000);
        assert_eq!(config.feed.buffer_interval_ms, 500);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = AppConfig::from_toml_str("[aggregator]\ncapacity = 0\n");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_bundled_default_file_parses() {
        let text = include_str!("../../config/default.toml");
        let config = AppConfig::from_toml_str(text).unwrap();
        assert_eq!(config.aggregator.capacity, 10_000);
    }
}

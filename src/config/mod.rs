pub mod feed;
pub mod aggregator;
pub mod simulator;
pub mod logging;
pub mod loader;

pub use aggregator::AggregatorConfig;
pub use feed::{BackoffConfig, FeedConfig};
pub use loader::AppConfig;
pub use logging::LoggingConfig;
pub use simulator::SimulatorConfig;

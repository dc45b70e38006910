pub mod types;
pub mod feed;
pub mod aggregator;
pub mod simulator;
pub mod error;
pub mod config;
pub mod observability;

// Maximum number of trades retained by the aggregator
pub const DEFAULT_WINDOW_CAPACITY: usize = 10_000;

// Path the feed serves trades on
pub const TRANSACTIONS_PATH: &str = "/transactions";

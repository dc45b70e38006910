pub mod window;
pub mod leaderboard;
pub mod state;
pub mod store;

pub use leaderboard::compute_leaderboard;
pub use state::{AggregatorState, AggregatorStatus, Delivery};
pub use store::TransactionAggregator;
pub use window::TransactionWindow;

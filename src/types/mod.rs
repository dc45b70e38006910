pub mod ids;
pub mod trade;
pub mod leaderboard;
pub mod connection;

pub use connection::ConnectionState;
pub use ids::{PlanetId, TradeId};
pub use leaderboard::LeaderboardEntry;
pub use trade::{ProductType, TradeEvent, TransactionType};

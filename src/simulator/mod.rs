pub mod generator;
pub mod server;

pub use generator::TradeGenerator;
pub use server::{router, serve};

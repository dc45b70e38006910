use serde::{Deserialize, Serialize};
use crate::types::ids::PlanetId;

/// Per-planet totals over the current transaction window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub planet_id: PlanetId,
    pub sum_transaction_value: f64,
    pub number_of_transactions: usize,
}

impl LeaderboardEntry {
    pub fn new(planet_id: PlanetId) -> Self {
        LeaderboardEntry {
            planet_id,
            sum_transaction_value: 0.0,
            number_of_transactions: 0,
        }
    }
}

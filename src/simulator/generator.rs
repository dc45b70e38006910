use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::types::{PlanetId, ProductType, TradeEvent, TradeId, TransactionType};

/// Produces plausible random trades for a fixed set of planets.
pub struct TradeGenerator {
    planets: Vec<PlanetId>,
    rng: StdRng,
}

impl TradeGenerator {
    pub fn new(planets: &[String], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        TradeGenerator {
            planets: planets.iter().map(|p| PlanetId::new(p.as_str())).collect(),
            rng,
        }
    }

    pub fn next_trade(&mut self) -> TradeEvent {
        let planet_id = if self.planets.is_empty() {
            PlanetId::from("unknown")
        } else {
            self.planets[self.rng.gen_range(0..self.planets.len())].clone()
        };

        let product = ProductType::ALL[self.rng.gen_range(0..ProductType::ALL.len())];
        let transaction_type = if self.rng.gen_bool(0.5) {
            TransactionType::Buy
        } else {
            TransactionType::Sell
        };

        TradeEvent {
            id: TradeId::generate(),
            planet_id,
            product,
            transaction_type,
            timestamp: Utc::now(),
            volume: (self.rng.gen_range(1.0..500.0_f64) * 100.0).round() / 100.0,
            price_per_unit: (self.rng.gen_range(0.5..120.0_f64) * 100.0).round() / 100.0,
        }
    }

    pub fn next_batch(&mut self, size: usize) -> Vec<TradeEvent> {
        (0..size).map(|_| self.next_trade()).collect()
    }
}

impl Iterator for TradeGenerator {
    type Item = TradeEvent;

    fn next(&mut self) -> Option<TradeEvent> {
        Some(self.next_trade())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::{Error, InvalidTradeReason, Result};
use crate::types::ids::{PlanetId, TradeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Energy,
    Food,
}

impl ProductType {
    pub const ALL: [ProductType; 2] = [ProductType::Energy, ProductType::Food];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

/// One executed trade as delivered by the feed.
///
/// Serialized with the feed's camelCase keys, e.g.
/// `{"id":"tx1","planetId":"p1","product":"ENERGY","transactionType":"BUY",
/// "timeStamp":"2026-01-18T20:00:00Z","volume":10.0,"pricePerUnit":5.0}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub id: TradeId,
    pub planet_id: PlanetId,
    pub product: ProductType,
    pub transaction_type: TransactionType,
    #[serde(rename = "timeStamp")]
    pub timestamp: DateTime<Utc>,
    pub volume: f64,
    pub price_per_unit: f64,
}

impl TradeEvent {
    /// Total traded value (volume * price per unit).
    pub fn notional(&self) -> f64 {
        self.volume * self.price_per_unit
    }

    /// Rejects events that would corrupt aggregation.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.id.is_empty() {
            Some(InvalidTradeReason::EmptyId)
        } else if self.planet_id.is_empty() {
            Some(InvalidTradeReason::EmptyPlanetId)
        } else if !self.volume.is_finite() || self.volume < 0.0 {
            Some(InvalidTradeReason::InvalidVolume)
        } else if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            Some(InvalidTradeReason::InvalidPrice)
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidTradeEvent {
                id: self.id.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

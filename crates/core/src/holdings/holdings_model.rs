//! Point-in-time holdings domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::QUANTITY_THRESHOLD;

/// Returns true if a quantity is large enough to count as an open position.
pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    quantity.abs() >= QUANTITY_THRESHOLD
}

/// One instrument position inside a holdings snapshot.
///
/// `average_cost` is only meaningful while `quantity > 0`; a position whose
/// quantity reaches zero is removed from the snapshot entirely, so its cost
/// basis is forgotten and a later BUY starts a fresh average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentHolding {
    pub isin: String,
    pub quantity: Decimal,
    /// Volume-weighted average acquisition NAV. A SELL never changes it.
    pub average_cost: Decimal,
    /// Date of the first BUY that opened the current position.
    pub inception_date: NaiveDate,
}

impl InstrumentHolding {
    pub fn new(isin: String, inception_date: NaiveDate) -> Self {
        InstrumentHolding {
            isin,
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            inception_date,
        }
    }

    /// Cost basis of the position at the weighted-average NAV.
    pub fn invested_value(&self) -> Decimal {
        self.quantity * self.average_cost
    }
}

/// The reconstructed state of a client's portfolio at close of `as_of_date`.
///
/// Ephemeral: recomputed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSnapshot {
    pub client_code: String,
    pub as_of_date: NaiveDate,
    /// isin -> open position. Closed positions are absent.
    #[serde(default)]
    pub positions: HashMap<String, InstrumentHolding>,
}

impl HoldingsSnapshot {
    pub fn new(client_code: String, as_of_date: NaiveDate) -> Self {
        HoldingsSnapshot {
            client_code,
            as_of_date,
            positions: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn instrument_count(&self) -> usize {
        self.positions.len()
    }
}

//! Price history domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One published NAV for an instrument on a trading date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub isin: String,
    pub price_date: NaiveDate,
    pub nav: Decimal,
}

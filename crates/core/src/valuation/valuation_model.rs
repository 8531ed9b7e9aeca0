//! Portfolio valuation domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One instrument of a snapshot joined with its point-in-time price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedHolding {
    pub isin: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    /// NAV used for the valuation.
    pub nav: Decimal,
    /// Date the NAV was published on.
    pub nav_date: NaiveDate,
    /// quantity * nav
    pub value: Decimal,
    /// True when the NAV was forward-filled from an earlier date because the
    /// exact date had no published price.
    pub price_is_stale: bool,
}

/// A fully priced holdings snapshot for one date.
///
/// Instruments with no price on or before the date contribute zero value and
/// are listed in `missing_prices`; they are an observable side effect for
/// upstream alerting, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotValuation {
    pub client_code: String,
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
    /// Sum of quantity * average_cost over priced instruments.
    pub invested_value: Decimal,
    pub priced: Vec<PricedHolding>,
    pub missing_prices: Vec<String>,
}

impl SnapshotValuation {
    /// Number of instruments that actually contributed to the valuation.
    pub fn holdings_count(&self) -> i32 {
        self.priced.len() as i32
    }
}

/// The persisted unit of the portfolio time series, unique per
/// (client_code, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuationRow {
    pub id: String,
    pub client_code: String,
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
    pub invested_value: Decimal,
    pub day_change: Decimal,
    /// None when the previous day's value is zero (divide-by-zero guard).
    pub day_change_pct: Option<Decimal>,
    /// Relative to the first row of the requested window, not inception.
    /// None when the window's first value is zero.
    pub cumulative_return_pct: Option<Decimal>,
    pub holdings_count: i32,
    pub calculated_at: NaiveDateTime,
}

impl PortfolioValuationRow {
    /// Deterministic row id: `<client_code>_<date>`.
    pub fn make_id(client_code: &str, date: NaiveDate) -> String {
        format!("{}_{}", client_code, date.format("%Y-%m-%d"))
    }
}

/// Calendar-month aggregation of a return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    /// Portfolio value on the month's first trading day.
    pub start_value: Decimal,
    /// Portfolio value on the month's last trading day.
    pub end_value: Decimal,
    /// `end_value` against `start_value`. None when the month opens at zero.
    pub return_pct: Option<Decimal>,
    /// Date with the largest day change in the month; None for
    /// single-row months.
    pub best_day: Option<NaiveDate>,
    /// Date with the smallest day change in the month; None for
    /// single-row months.
    pub worst_day: Option<NaiveDate>,
    pub trading_days: usize,
}

/// A client whose pipeline failed during a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFailure {
    pub client_code: String,
    pub reason: String,
}

/// Result of a batch run over independent client pipelines.
///
/// One client's fatal error never aborts siblings; both lists are reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<ClientFailure>,
}

//! Collaborator interface for the per-instrument price history.

use chrono::NaiveDate;

use super::PricePoint;
use crate::errors::Result;

/// Forward-filled point-in-time price lookups.
///
/// Lookups are independent per instrument; callers may fan them out freely.
pub trait PriceIndexTrait: Send + Sync {
    /// Latest known NAV for `isin` on or before `on_or_before`.
    ///
    /// Returns `Ok(None)` when no price exists before the earliest record;
    /// that is an expected outcome, not an error. The returned
    /// `PricePoint::price_date` may be earlier than the requested date when
    /// the exact date had no published price.
    fn latest_nav(&self, isin: &str, on_or_before: NaiveDate) -> Result<Option<PricePoint>>;

    /// Distinct trading dates with at least one published price in the
    /// inclusive range, ascending. Backfills iterate these instead of raw
    /// calendar days so weekends and holidays produce no rows.
    fn price_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// Most recent date with any published price, if the history is non-empty.
    fn latest_price_date(&self) -> Result<Option<NaiveDate>>;
}

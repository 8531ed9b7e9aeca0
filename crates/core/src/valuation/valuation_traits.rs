//! Storage trait for the persisted portfolio time series.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::PortfolioValuationRow;
use crate::errors::Result;

/// Repository for the (client_code, date)-keyed valuation time series.
#[async_trait]
pub trait TimeSeriesRepositoryTrait: Send + Sync {
    /// Upserts rows with last-write-wins semantics: insert when the
    /// (client_code, date) key is absent, otherwise overwrite the numeric
    /// fields in place. Re-running the same rows is a no-op; the operation
    /// is idempotent, never additive. Each row's upsert is atomic.
    async fn save_rows(&self, rows: &[PortfolioValuationRow]) -> Result<()>;

    /// Rows for a client within the optional inclusive range, date ascending.
    fn get_series(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>>;

    /// Most recent stored date for a client, if any.
    fn load_latest_date(&self, client_code: &str) -> Result<Option<NaiveDate>>;

    /// Rows for several clients on one date, ordered by portfolio value
    /// descending.
    fn get_rows_on_date(
        &self,
        client_codes: &[String],
        date: NaiveDate,
    ) -> Result<Vec<PortfolioValuationRow>>;
}

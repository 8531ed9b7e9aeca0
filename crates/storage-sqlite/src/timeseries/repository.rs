//! Repository for the valuation time series.
//!
//! Reads come straight off the pool; writes are serialized through the
//! writer actor so concurrent client pipelines never contend on the SQLite
//! write lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use super::model::PortfolioTimeseriesDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::portfolio_timeseries::dsl as timeseries_dsl;
use crate::utils::{chunk_for_sqlite, DATE_FORMAT};
use folionav_core::valuation::valuation_traits::TimeSeriesRepositoryTrait;
use folionav_core::valuation::PortfolioValuationRow;
use folionav_core::Result;

pub struct TimeSeriesRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl TimeSeriesRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TimeSeriesRepositoryTrait for TimeSeriesRepository {
    /// Upserts rows keyed by id. `replace_into` overwrites rows recomputed
    /// for dates that already exist, so reruns converge instead of
    /// accumulating duplicates.
    async fn save_rows(&self, rows: &[PortfolioValuationRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let db_rows: Vec<PortfolioTimeseriesDB> =
            rows.iter().map(PortfolioTimeseriesDB::from).collect();
        debug!("Upserting {} time-series rows", db_rows.len());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                for chunk in chunk_for_sqlite(&db_rows) {
                    diesel::replace_into(timeseries_dsl::portfolio_timeseries)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(())
            })
            .await
    }

    fn get_series(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = timeseries_dsl::portfolio_timeseries
            .filter(timeseries_dsl::client_code.eq(client_code))
            .order(timeseries_dsl::date.asc())
            .into_boxed();

        if let Some(start) = start_date {
            query = query.filter(timeseries_dsl::date.ge(start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = end_date {
            query = query.filter(timeseries_dsl::date.le(end.format(DATE_FORMAT).to_string()));
        }

        let rows = query.load::<PortfolioTimeseriesDB>(&mut conn).into_core()?;
        rows.into_iter()
            .map(PortfolioTimeseriesDB::into_domain)
            .collect()
    }

    fn load_latest_date(&self, client_code: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let latest: Option<String> = timeseries_dsl::portfolio_timeseries
            .filter(timeseries_dsl::client_code.eq(client_code))
            .select(timeseries_dsl::date)
            .order(timeseries_dsl::date.desc())
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;

        latest
            .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).map_err(Into::into))
            .transpose()
    }

    /// Cross-client view of one date, largest portfolios first.
    fn get_rows_on_date(
        &self,
        client_codes: &[String],
        date: NaiveDate,
    ) -> Result<Vec<PortfolioValuationRow>> {
        if client_codes.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let date_str = date.format(DATE_FORMAT).to_string();

        let mut rows: Vec<PortfolioValuationRow> = Vec::new();
        for chunk in chunk_for_sqlite(client_codes) {
            let db_rows = timeseries_dsl::portfolio_timeseries
                .filter(timeseries_dsl::date.eq(&date_str))
                .filter(timeseries_dsl::client_code.eq_any(chunk))
                .load::<PortfolioTimeseriesDB>(&mut conn)
                .into_core()?;
            for db_row in db_rows {
                rows.push(db_row.into_domain()?);
            }
        }

        rows.sort_by(|a, b| b.portfolio_value.cmp(&a.portfolio_value));
        Ok(rows)
    }
}

//! Read-only repository over the published NAV history.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::model::InstrumentPriceDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::instrument_prices::dsl as prices_dsl;
use crate::utils::DATE_FORMAT;
use folionav_core::prices::{PriceIndexTrait, PricePoint};
use folionav_core::Result;

pub struct PriceIndexRepository {
    pool: DbPool,
}

impl PriceIndexRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PriceIndexTrait for PriceIndexRepository {
    /// Most recent published NAV on or before `on_or_before`. This is the
    /// forward-fill lookup: price gaps fall back to the last trading day.
    fn latest_nav(&self, isin: &str, on_or_before: NaiveDate) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let row = prices_dsl::instrument_prices
            .filter(prices_dsl::isin.eq(isin))
            .filter(prices_dsl::price_date.le(on_or_before.format(DATE_FORMAT).to_string()))
            .order(prices_dsl::price_date.desc())
            .first::<InstrumentPriceDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(InstrumentPriceDB::into_domain).transpose()
    }

    /// Distinct dates with at least one published NAV, ascending.
    fn price_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let dates: Vec<String> = prices_dsl::instrument_prices
            .filter(prices_dsl::price_date.ge(start.format(DATE_FORMAT).to_string()))
            .filter(prices_dsl::price_date.le(end.format(DATE_FORMAT).to_string()))
            .select(prices_dsl::price_date)
            .distinct()
            .order(prices_dsl::price_date.asc())
            .load::<String>(&mut conn)
            .into_core()?;

        dates
            .into_iter()
            .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).map_err(Into::into))
            .collect()
    }

    fn latest_price_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let latest: Option<String> = prices_dsl::instrument_prices
            .select(prices_dsl::price_date)
            .order(prices_dsl::price_date.desc())
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;

        latest
            .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).map_err(Into::into))
            .transpose()
    }
}

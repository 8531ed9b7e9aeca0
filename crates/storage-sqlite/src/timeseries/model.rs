//! Database model for the valuation time series.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::{DATE_FORMAT, TIMESTAMP_FORMAT};
use folionav_core::valuation::PortfolioValuationRow;
use folionav_core::Result;

#[derive(
    Queryable,
    Identifiable,
    Selectable,
    Insertable,
    AsChangeset,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::portfolio_timeseries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTimeseriesDB {
    /// `"<client_code>_<date>"`; makes `replace_into` an idempotent upsert
    /// on the (client, date) key.
    pub id: String,
    pub client_code: String,
    pub date: String,
    pub portfolio_value: String,
    pub invested_value: String,
    pub day_change: String,
    pub day_change_pct: Option<String>,
    pub cumulative_return_pct: Option<String>,
    pub holdings_count: i32,
    pub calculated_at: String,
}

fn parse_optional_decimal(value: Option<String>) -> Result<Option<Decimal>> {
    value
        .map(|s| Decimal::from_str(&s).map_err(Into::into))
        .transpose()
}

impl PortfolioTimeseriesDB {
    pub fn into_domain(self) -> Result<PortfolioValuationRow> {
        Ok(PortfolioValuationRow {
            id: self.id,
            client_code: self.client_code,
            date: NaiveDate::parse_from_str(&self.date, DATE_FORMAT)?,
            portfolio_value: Decimal::from_str(&self.portfolio_value)?,
            invested_value: Decimal::from_str(&self.invested_value)?,
            day_change: Decimal::from_str(&self.day_change)?,
            day_change_pct: parse_optional_decimal(self.day_change_pct)?,
            cumulative_return_pct: parse_optional_decimal(self.cumulative_return_pct)?,
            holdings_count: self.holdings_count,
            calculated_at: NaiveDateTime::parse_from_str(&self.calculated_at, TIMESTAMP_FORMAT)?,
        })
    }
}

impl From<&PortfolioValuationRow> for PortfolioTimeseriesDB {
    fn from(row: &PortfolioValuationRow) -> Self {
        PortfolioTimeseriesDB {
            id: row.id.clone(),
            client_code: row.client_code.clone(),
            date: row.date.format(DATE_FORMAT).to_string(),
            portfolio_value: row.portfolio_value.to_string(),
            invested_value: row.invested_value.to_string(),
            day_change: row.day_change.to_string(),
            day_change_pct: row.day_change_pct.map(|d| d.to_string()),
            cumulative_return_pct: row.cumulative_return_pct.map(|d| d.to_string()),
            holdings_count: row.holdings_count,
            calculated_at: row.calculated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

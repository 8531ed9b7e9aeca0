//! Database model for the per-instrument NAV history.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::DATE_FORMAT;
use folionav_core::prices::PricePoint;
use folionav_core::Result;

#[derive(
    Queryable, Identifiable, Selectable, Insertable, Debug, Clone, Serialize, Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::instrument_prices)]
#[diesel(primary_key(isin, price_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InstrumentPriceDB {
    pub isin: String,
    pub price_date: String,
    pub nav: String,
}

impl InstrumentPriceDB {
    pub fn into_domain(self) -> Result<PricePoint> {
        Ok(PricePoint {
            isin: self.isin,
            price_date: NaiveDate::parse_from_str(&self.price_date, DATE_FORMAT)?,
            nav: Decimal::from_str(&self.nav)?,
        })
    }
}

impl From<&PricePoint> for InstrumentPriceDB {
    fn from(point: &PricePoint) -> Self {
        InstrumentPriceDB {
            isin: point.isin.clone(),
            price_date: point.price_date.format(DATE_FORMAT).to_string(),
            nav: point.nav.to_string(),
        }
    }
}

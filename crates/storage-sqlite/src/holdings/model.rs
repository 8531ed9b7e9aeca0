//! Database model for the live current-holdings table.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::DATE_FORMAT;
use folionav_core::holdings::InstrumentHolding;
use folionav_core::Result;

#[derive(
    Queryable, Identifiable, Selectable, Insertable, Debug, Clone, Serialize, Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(primary_key(client_code, isin))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HoldingDB {
    pub client_code: String,
    pub isin: String,
    pub quantity: String,
    pub average_cost: String,
    pub inception_date: String,
}

impl HoldingDB {
    pub fn into_domain(self) -> Result<InstrumentHolding> {
        Ok(InstrumentHolding {
            isin: self.isin,
            quantity: Decimal::from_str(&self.quantity)?,
            average_cost: Decimal::from_str(&self.average_cost)?,
            inception_date: NaiveDate::parse_from_str(&self.inception_date, DATE_FORMAT)?,
        })
    }
}

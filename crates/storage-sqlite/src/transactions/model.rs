//! Database model for the transaction ledger.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::{DATE_FORMAT, TIMESTAMP_FORMAT};
use folionav_core::transactions::{TransactionRecord, TransactionType};
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
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    pub id: String,
    pub client_code: String,
    pub isin: String,
    pub transaction_date: String,
    pub transaction_type: String,
    pub units: String,
    pub nav: String,
    pub amount: String,
    pub seq: i64,
    pub created_at: String,
}

impl TransactionDB {
    /// Converts the stored row to the domain record, surfacing malformed
    /// dates, decimals, or transaction types as validation errors.
    pub fn into_domain(self) -> Result<TransactionRecord> {
        Ok(TransactionRecord {
            id: self.id,
            client_code: self.client_code,
            isin: self.isin,
            transaction_date: NaiveDate::parse_from_str(&self.transaction_date, DATE_FORMAT)?,
            transaction_type: TransactionType::from_str(&self.transaction_type)?,
            units: Decimal::from_str(&self.units)?,
            nav: Decimal::from_str(&self.nav)?,
            amount: Decimal::from_str(&self.amount)?,
            seq: self.seq,
            created_at: NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT)?,
        })
    }
}

impl From<&TransactionRecord> for TransactionDB {
    fn from(record: &TransactionRecord) -> Self {
        TransactionDB {
            id: record.id.clone(),
            client_code: record.client_code.clone(),
            isin: record.isin.clone(),
            transaction_date: record.transaction_date.format(DATE_FORMAT).to_string(),
            transaction_type: record.transaction_type.as_str().to_string(),
            units: record.units.to_string(),
            nav: record.nav.to_string(),
            amount: record.amount.to_string(),
            seq: record.seq,
            created_at: record.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

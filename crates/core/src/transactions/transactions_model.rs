//! Transaction ledger domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::transactions_errors::LedgerError;

pub const TRANSACTION_TYPE_BUY: &str = "BUY";
pub const TRANSACTION_TYPE_SELL: &str = "SELL";
// Legacy aliases still present in the upstream trade feed.
pub const TRANSACTION_TYPE_PURCHASE: &str = "PURCHASE";
pub const TRANSACTION_TYPE_REDEMPTION: &str = "REDEMPTION";

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
        }
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            TRANSACTION_TYPE_BUY | TRANSACTION_TYPE_PURCHASE => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL | TRANSACTION_TYPE_REDEMPTION => Ok(TransactionType::Sell),
            other => Err(LedgerError::InvalidTransaction(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

/// A single row of the append-only transaction ledger.
///
/// Records are created by upstream trade capture and never mutated here.
/// Ordering within a date is insertion order, carried by the monotonic `seq`
/// field; intraday timestamps are not guaranteed by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub client_code: String,
    pub isin: String,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    /// Unit quantity, strictly positive.
    pub units: Decimal,
    /// Unit price (NAV) at execution, strictly positive.
    pub nav: Decimal,
    /// Gross amount of the transaction (units * nav).
    pub amount: Decimal,
    /// Monotonic sequence number breaking intraday ties.
    pub seq: i64,
    pub created_at: NaiveDateTime,
}

impl TransactionRecord {
    /// Validates the positivity invariants the replay fold relies on.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.units <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction {} has non-positive units {}",
                self.id, self.units
            )));
        }
        if self.nav <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction {} has non-positive NAV {}",
                self.id, self.nav
            )));
        }
        Ok(())
    }
}

//! Ledger-specific error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while reading or replaying the transaction ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A SELL exceeds the cumulative bought quantity for an instrument.
    /// The ledger promised more sell volume than was ever bought; this is a
    /// data error and is surfaced, never clamped.
    #[error(
        "Inconsistent ledger for client {client_code}: SELL of {sell_units} units of {isin} on {date} exceeds held quantity {held_units}"
    )]
    InconsistentLedger {
        client_code: String,
        isin: String,
        date: NaiveDate,
        sell_units: Decimal,
        held_units: Decimal,
    },

    /// A transaction record that cannot be interpreted (unknown type,
    /// non-positive units or price).
    #[error("Invalid transaction record: {0}")]
    InvalidTransaction(String),
}

//! Collaborator interface for the append-only transaction ledger.

use chrono::NaiveDate;

use super::TransactionRecord;
use crate::errors::Result;

/// Read-only view of the transaction ledger.
///
/// Implementations must return records ordered by
/// `(transaction_date, seq)` ascending; the replay fold depends on it.
pub trait TransactionLedgerTrait: Send + Sync {
    /// All transactions for `client_code` with date <= `date_upper_bound`.
    fn list_transactions(
        &self,
        client_code: &str,
        date_upper_bound: NaiveDate,
    ) -> Result<Vec<TransactionRecord>>;

    /// Date of the client's earliest transaction, if any.
    fn first_transaction_date(&self, client_code: &str) -> Result<Option<NaiveDate>>;
}

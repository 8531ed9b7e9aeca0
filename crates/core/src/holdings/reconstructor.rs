//! Ledger replay: reconstructs point-in-time holdings snapshots.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{Error, Result, ValidationError};
use crate::transactions::{
    LedgerError, TransactionLedgerTrait, TransactionRecord, TransactionType,
};

use super::holdings_model::{is_quantity_significant, HoldingsSnapshot, InstrumentHolding};

/// Replays a client's transaction history to produce holdings snapshots.
///
/// Pure function of the ledger contents up to the cutoff date: the same
/// ledger always yields the same snapshot, regardless of when it is asked.
#[derive(Clone)]
pub struct HoldingsReconstructor {
    ledger: Arc<dyn TransactionLedgerTrait>,
}

impl HoldingsReconstructor {
    pub fn new(ledger: Arc<dyn TransactionLedgerTrait>) -> Self {
        Self { ledger }
    }

    /// Holdings for `client_code` at close of `as_of_date`.
    pub fn reconstruct(&self, client_code: &str, as_of_date: NaiveDate) -> Result<HoldingsSnapshot> {
        let transactions = self.ledger.list_transactions(client_code, as_of_date)?;
        debug!(
            "Replaying {} transactions for client {} up to {}",
            transactions.len(),
            client_code,
            as_of_date
        );

        let mut positions: HashMap<String, InstrumentHolding> = HashMap::new();
        for transaction in &transactions {
            apply_transaction(&mut positions, client_code, transaction)?;
        }

        Ok(HoldingsSnapshot {
            client_code: client_code.to_string(),
            as_of_date,
            positions,
        })
    }

    /// Snapshots for an ascending sequence of dates in one ledger scan.
    ///
    /// Equivalent to calling [`reconstruct`](Self::reconstruct) per date, but
    /// the fold state is carried across date boundaries so a full backfill
    /// costs one pass over the ledger instead of one per date.
    pub fn reconstruct_series(
        &self,
        client_code: &str,
        dates: &[NaiveDate],
    ) -> Result<Vec<HoldingsSnapshot>> {
        let Some(&last_date) = dates.last() else {
            return Ok(Vec::new());
        };
        if dates.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "reconstruct_series requires dates in ascending order".to_string(),
            )));
        }

        let transactions = self.ledger.list_transactions(client_code, last_date)?;
        debug!(
            "Replaying {} transactions for client {} across {} snapshot dates",
            transactions.len(),
            client_code,
            dates.len()
        );

        let mut positions: HashMap<String, InstrumentHolding> = HashMap::new();
        let mut snapshots = Vec::with_capacity(dates.len());
        let mut remaining = transactions.iter().peekable();

        for &date in dates {
            while let Some(transaction) = remaining.peek() {
                if transaction.transaction_date > date {
                    break;
                }
                apply_transaction(&mut positions, client_code, transaction)?;
                remaining.next();
            }
            snapshots.push(HoldingsSnapshot {
                client_code: client_code.to_string(),
                as_of_date: date,
                positions: positions.clone(),
            });
        }

        Ok(snapshots)
    }
}

/// Applies one transaction to the running position map.
///
/// BUY re-averages the cost basis; SELL reduces quantity only. A position
/// whose remaining quantity falls below the significance threshold is
/// removed, forgetting its cost basis.
fn apply_transaction(
    positions: &mut HashMap<String, InstrumentHolding>,
    client_code: &str,
    transaction: &TransactionRecord,
) -> Result<()> {
    transaction.validate()?;

    match transaction.transaction_type {
        TransactionType::Buy => {
            let holding = positions
                .entry(transaction.isin.clone())
                .or_insert_with(|| {
                    InstrumentHolding::new(transaction.isin.clone(), transaction.transaction_date)
                });
            let new_quantity = holding.quantity + transaction.units;
            holding.average_cost = (holding.quantity * holding.average_cost
                + transaction.units * transaction.nav)
                / new_quantity;
            holding.quantity = new_quantity;
        }
        TransactionType::Sell => {
            let held_units = positions
                .get(&transaction.isin)
                .map(|h| h.quantity)
                .unwrap_or(Decimal::ZERO);
            let remaining = held_units - transaction.units;
            if remaining < Decimal::ZERO && is_quantity_significant(&remaining) {
                return Err(Error::Ledger(LedgerError::InconsistentLedger {
                    client_code: client_code.to_string(),
                    isin: transaction.isin.clone(),
                    date: transaction.transaction_date,
                    sell_units: transaction.units,
                    held_units,
                }));
            }
            match positions.get_mut(&transaction.isin) {
                Some(holding) if is_quantity_significant(&remaining) => {
                    holding.quantity = remaining;
                }
                Some(_) => {
                    // Sold to zero: the position closes and its cost basis is
                    // forgotten. A later BUY starts a fresh average.
                    positions.remove(&transaction.isin);
                }
                None => {}
            }
        }
    }

    Ok(())
}

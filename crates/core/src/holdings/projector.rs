//! Fast-path holdings from the authoritative current-holdings table.

use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use crate::errors::Result;

use super::holdings_model::{is_quantity_significant, HoldingsSnapshot};
use super::holdings_traits::CurrentHoldingsTrait;

/// Projects the live current-holdings table as a holdings snapshot.
///
/// A substitute for ledger replay only within the configured freshness
/// window, where the live table is trusted to equal what replay would
/// produce. Strategy selection lives in [`super::HoldingsResolver`]; this
/// type never decides when it applies.
#[derive(Clone)]
pub struct LiveHoldingsProjector {
    holdings: Arc<dyn CurrentHoldingsTrait>,
}

impl LiveHoldingsProjector {
    pub fn new(holdings: Arc<dyn CurrentHoldingsTrait>) -> Self {
        Self { holdings }
    }

    /// Current holdings for the client, stamped with `as_of_date`.
    pub fn project(&self, client_code: &str, as_of_date: NaiveDate) -> Result<HoldingsSnapshot> {
        let rows = self.holdings.current_holdings(client_code)?;
        debug!(
            "Projected {} live positions for client {}",
            rows.len(),
            client_code
        );

        let mut snapshot = HoldingsSnapshot::new(client_code.to_string(), as_of_date);
        for holding in rows {
            if !is_quantity_significant(&holding.quantity) {
                continue;
            }
            snapshot.positions.insert(holding.isin.clone(), holding);
        }
        Ok(snapshot)
    }
}

//! Collaborator interface for the authoritative current-holdings table.

use super::InstrumentHolding;
use crate::errors::Result;

/// Read-only view of the externally maintained current-holdings table.
///
/// The table carries quantity and average cost kept up to date by upstream
/// trade capture. It reflects "now"; point-in-time questions go through
/// ledger replay instead.
pub trait CurrentHoldingsTrait: Send + Sync {
    /// Open positions for the client (quantity > 0).
    fn current_holdings(&self, client_code: &str) -> Result<Vec<InstrumentHolding>>;

    /// All client codes with at least one open position.
    fn clients_with_holdings(&self) -> Result<Vec<String>>;
}

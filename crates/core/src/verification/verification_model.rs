use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A per-instrument mismatch between the replayed ledger and the live
/// holdings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub isin: String,
    /// Quantity the transaction ledger replays to.
    pub expected_quantity: Decimal,
    /// Quantity the live holdings table reports.
    pub actual_quantity: Decimal,
    /// `actual_quantity - expected_quantity`.
    pub difference: Decimal,
}

/// Outcome of a consistency check for one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub client_code: String,
    pub discrepancies: Vec<Discrepancy>,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

//! Cross-checks the live holdings table against a full ledger replay.

use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::errors::Result;
use crate::holdings::{is_quantity_significant, HoldingsReconstructor, LiveHoldingsProjector};

use super::verification_model::{Discrepancy, VerificationReport};

/// Compares the quantities a ledger replay produces with the quantities the
/// live holdings table reports, flagging every instrument whose difference
/// is significant.
///
/// The two sources are maintained independently, so a drift here means a
/// transaction was recorded in one place but not the other.
pub struct ConsistencyVerifier {
    reconstructor: HoldingsReconstructor,
    projector: LiveHoldingsProjector,
}

impl ConsistencyVerifier {
    pub fn new(reconstructor: HoldingsReconstructor, projector: LiveHoldingsProjector) -> Self {
        Self {
            reconstructor,
            projector,
        }
    }

    /// Verifies one client as of `as_of_date`. An empty discrepancy list
    /// means the two sources agree on every instrument.
    pub fn verify(&self, client_code: &str, as_of_date: NaiveDate) -> Result<VerificationReport> {
        let replayed = self.reconstructor.reconstruct(client_code, as_of_date)?;
        let live = self.projector.project(client_code, as_of_date)?;

        let isins: BTreeSet<&String> = replayed
            .positions
            .keys()
            .chain(live.positions.keys())
            .collect();

        let mut discrepancies = Vec::new();
        for isin in isins {
            let expected = replayed
                .positions
                .get(isin)
                .map_or(Decimal::ZERO, |p| p.quantity);
            let actual = live
                .positions
                .get(isin)
                .map_or(Decimal::ZERO, |p| p.quantity);
            let difference = actual - expected;
            if is_quantity_significant(&difference) {
                warn!(
                    "Holdings drift for client {} instrument {}: ledger replays {} but live table has {}",
                    client_code, isin, expected, actual
                );
                discrepancies.push(Discrepancy {
                    isin: isin.clone(),
                    expected_quantity: expected,
                    actual_quantity: actual,
                    difference,
                });
            }
        }

        info!(
            "Verified client {} as of {}: {} discrepancy(ies)",
            client_code,
            as_of_date,
            discrepancies.len()
        );
        Ok(VerificationReport {
            client_code: client_code.to_string(),
            discrepancies,
        })
    }
}

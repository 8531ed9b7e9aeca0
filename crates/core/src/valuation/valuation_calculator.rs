//! Prices a holdings snapshot against the point-in-time price index.

use log::warn;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::holdings::HoldingsSnapshot;
use crate::prices::PriceIndexTrait;

use super::valuation_model::{PricedHolding, SnapshotValuation};

/// Values every position of `snapshot` at the latest NAV on or before the
/// snapshot date.
///
/// Price lookups are independent per instrument. An instrument with no price
/// on or before the date is excluded from the totals, flagged in
/// `missing_prices`, and logged; the valuation itself still succeeds.
pub fn value_snapshot(
    snapshot: &HoldingsSnapshot,
    price_index: &dyn PriceIndexTrait,
) -> Result<SnapshotValuation> {
    let date = snapshot.as_of_date;

    // Deterministic output order for logging and persistence.
    let mut isins: Vec<&String> = snapshot.positions.keys().collect();
    isins.sort();

    let mut priced = Vec::with_capacity(isins.len());
    let mut missing_prices = Vec::new();
    let mut portfolio_value = Decimal::ZERO;
    let mut invested_value = Decimal::ZERO;

    for isin in isins {
        let holding = &snapshot.positions[isin];
        match price_index.latest_nav(isin, date)? {
            Some(price) => {
                let value = holding.quantity * price.nav;
                portfolio_value += value;
                invested_value += holding.invested_value();
                priced.push(PricedHolding {
                    isin: holding.isin.clone(),
                    quantity: holding.quantity,
                    average_cost: holding.average_cost,
                    nav: price.nav,
                    nav_date: price.price_date,
                    value,
                    price_is_stale: price.price_date < date,
                });
            }
            None => {
                warn!(
                    "No NAV for {} on or before {} (client {}). Excluded from valuation.",
                    isin, date, snapshot.client_code
                );
                missing_prices.push(holding.isin.clone());
            }
        }
    }

    Ok(SnapshotValuation {
        client_code: snapshot.client_code.clone(),
        date,
        portfolio_value,
        invested_value,
        priced,
        missing_prices,
    })
}

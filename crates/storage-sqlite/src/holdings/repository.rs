//! Read-only repository over the live current-holdings table.
//!
//! This table is maintained by upstream trade capture and reflects holdings
//! as of the last feed run; the projector in `folionav-core` decides when it
//! is fresh enough to stand in for a ledger replay.

use diesel::prelude::*;

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::holdings::dsl as holdings_dsl;
use folionav_core::holdings::{CurrentHoldingsTrait, InstrumentHolding};
use folionav_core::Result;

pub struct HoldingsRepository {
    pool: DbPool,
}

impl HoldingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CurrentHoldingsTrait for HoldingsRepository {
    fn current_holdings(&self, client_code: &str) -> Result<Vec<InstrumentHolding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings_dsl::holdings
            .filter(holdings_dsl::client_code.eq(client_code))
            .order(holdings_dsl::isin.asc())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(HoldingDB::into_domain).collect()
    }

    fn clients_with_holdings(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;

        holdings_dsl::holdings
            .select(holdings_dsl::client_code)
            .distinct()
            .order(holdings_dsl::client_code.asc())
            .load::<String>(&mut conn)
            .into_core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_pool;
    use rust_decimal_macros::dec;

    fn seed(pool: &DbPool, client_code: &str, isin: &str, quantity: &str) {
        let mut conn = get_connection(pool).unwrap();
        let row = HoldingDB {
            client_code: client_code.to_string(),
            isin: isin.to_string(),
            quantity: quantity.to_string(),
            average_cost: "50".to_string(),
            inception_date: "2024-01-01".to_string(),
        };
        diesel::insert_into(holdings_dsl::holdings)
            .values(&row)
            .execute(&mut conn)
            .unwrap();
    }

    #[test]
    fn holdings_are_scoped_to_the_client() {
        let (pool, _temp_dir) = create_test_pool();
        let repo = HoldingsRepository::new(pool.clone());
        seed(&pool, "C001", "INF002", "10");
        seed(&pool, "C001", "INF001", "5");
        seed(&pool, "C002", "INF001", "99");

        let holdings = repo.current_holdings("C001").unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].isin, "INF001");
        assert_eq!(holdings[0].quantity, dec!(5));
        assert_eq!(holdings[1].isin, "INF002");
    }

    #[test]
    fn clients_with_holdings_deduplicates() {
        let (pool, _temp_dir) = create_test_pool();
        let repo = HoldingsRepository::new(pool.clone());
        seed(&pool, "C002", "INF001", "1");
        seed(&pool, "C001", "INF001", "1");
        seed(&pool, "C001", "INF002", "1");

        assert_eq!(
            repo.clients_with_holdings().unwrap(),
            vec!["C001".to_string(), "C002".to_string()]
        );
    }
}

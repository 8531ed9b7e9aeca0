//! Read-only repository over the append-only transaction ledger.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::transactions::dsl as transactions_dsl;
use crate::utils::DATE_FORMAT;
use folionav_core::transactions::{TransactionLedgerTrait, TransactionRecord};
use folionav_core::Result;

pub struct TransactionLedgerRepository {
    pool: DbPool,
}

impl TransactionLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TransactionLedgerTrait for TransactionLedgerRepository {
    fn list_transactions(
        &self,
        client_code: &str,
        date_upper_bound: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)?;

        // ISO dates sort lexicographically, so the text comparison is a
        // correct date comparison. (seq) breaks intraday ties.
        let rows = transactions_dsl::transactions
            .filter(transactions_dsl::client_code.eq(client_code))
            .filter(
                transactions_dsl::transaction_date
                    .le(date_upper_bound.format(DATE_FORMAT).to_string()),
            )
            .order((
                transactions_dsl::transaction_date.asc(),
                transactions_dsl::seq.asc(),
            ))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(TransactionDB::into_domain).collect()
    }

    fn first_transaction_date(&self, client_code: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let earliest: Option<String> = transactions_dsl::transactions
            .filter(transactions_dsl::client_code.eq(client_code))
            .select(transactions_dsl::transaction_date)
            .order(transactions_dsl::transaction_date.asc())
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;

        earliest
            .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).map_err(Into::into))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_pool;
    use folionav_core::transactions::TransactionType;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(
        pool: &DbPool,
        seq: i64,
        client_code: &str,
        d: NaiveDate,
        transaction_type: &str,
    ) {
        let mut conn = get_connection(pool).unwrap();
        let row = TransactionDB {
            id: format!("TX-{}", seq),
            client_code: client_code.to_string(),
            isin: "INF001".to_string(),
            transaction_date: d.format(DATE_FORMAT).to_string(),
            transaction_type: transaction_type.to_string(),
            units: dec!(10).to_string(),
            nav: dec!(50).to_string(),
            amount: dec!(500).to_string(),
            seq,
            created_at: "2024-01-01T00:00:00.000".to_string(),
        };
        diesel::insert_into(transactions_dsl::transactions)
            .values(&row)
            .execute(&mut conn)
            .unwrap();
    }

    fn repository() -> (TransactionLedgerRepository, DbPool, TempDir) {
        let (pool, temp_dir) = create_test_pool();
        (
            TransactionLedgerRepository::new(pool.clone()),
            pool,
            temp_dir,
        )
    }

    #[test]
    fn transactions_come_back_in_replay_order() {
        let (repo, pool, _temp_dir) = repository();
        // Inserted out of order; seq breaks the intraday tie on Jan 2.
        seed(&pool, 5, "C001", date(2024, 1, 2), "BUY");
        seed(&pool, 2, "C001", date(2024, 1, 2), "SELL");
        seed(&pool, 9, "C001", date(2024, 1, 1), "BUY");

        let rows = repo.list_transactions("C001", date(2024, 12, 31)).unwrap();
        let order: Vec<(NaiveDate, i64)> =
            rows.iter().map(|t| (t.transaction_date, t.seq)).collect();
        assert_eq!(
            order,
            vec![
                (date(2024, 1, 1), 9),
                (date(2024, 1, 2), 2),
                (date(2024, 1, 2), 5),
            ]
        );
    }

    #[test]
    fn upper_bound_and_client_filters_apply() {
        let (repo, pool, _temp_dir) = repository();
        seed(&pool, 1, "C001", date(2024, 1, 1), "BUY");
        seed(&pool, 2, "C001", date(2024, 2, 1), "BUY");
        seed(&pool, 3, "C002", date(2024, 1, 1), "BUY");

        let rows = repo.list_transactions("C001", date(2024, 1, 15)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "TX-1");
    }

    #[test]
    fn legacy_type_aliases_parse_at_the_boundary() {
        let (repo, pool, _temp_dir) = repository();
        seed(&pool, 1, "C001", date(2024, 1, 1), "PURCHASE");
        seed(&pool, 2, "C001", date(2024, 1, 2), "REDEMPTION");

        let rows = repo.list_transactions("C001", date(2024, 12, 31)).unwrap();
        assert_eq!(rows[0].transaction_type, TransactionType::Buy);
        assert_eq!(rows[1].transaction_type, TransactionType::Sell);
    }

    #[test]
    fn first_transaction_date_is_the_minimum() {
        let (repo, pool, _temp_dir) = repository();
        assert_eq!(repo.first_transaction_date("C001").unwrap(), None);

        seed(&pool, 1, "C001", date(2024, 3, 1), "BUY");
        seed(&pool, 2, "C001", date(2024, 1, 15), "BUY");

        assert_eq!(
            repo.first_transaction_date("C001").unwrap(),
            Some(date(2024, 1, 15))
        );
    }
}

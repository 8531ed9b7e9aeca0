#[cfg(test)]
mod tests {
    use crate::errors::Result;
    use crate::holdings::{
        CurrentHoldingsTrait, HoldingsReconstructor, HoldingsResolver, InstrumentHolding,
        LiveHoldingsProjector, SnapshotPolicy,
    };
    use crate::prices::{PriceIndexTrait, PricePoint};
    use crate::transactions::{
        TransactionLedgerTrait, TransactionRecord, TransactionType,
    };
    use crate::valuation::valuation_service::{ValuationService, ValuationServiceTrait};
    use crate::valuation::valuation_traits::TimeSeriesRepositoryTrait;
    use crate::valuation::PortfolioValuationRow;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // --- Mock collaborators ---

    struct MockLedger {
        transactions: Vec<TransactionRecord>,
    }

    impl TransactionLedgerTrait for MockLedger {
        fn list_transactions(
            &self,
            client_code: &str,
            date_upper_bound: NaiveDate,
        ) -> Result<Vec<TransactionRecord>> {
            let mut rows: Vec<TransactionRecord> = self
                .transactions
                .iter()
                .filter(|t| t.client_code == client_code && t.transaction_date <= date_upper_bound)
                .cloned()
                .collect();
            rows.sort_by_key(|t| (t.transaction_date, t.seq));
            Ok(rows)
        }

        fn first_transaction_date(&self, client_code: &str) -> Result<Option<NaiveDate>> {
            Ok(self
                .transactions
                .iter()
                .filter(|t| t.client_code == client_code)
                .map(|t| t.transaction_date)
                .min())
        }
    }

    struct MockPriceIndex {
        prices: Vec<PricePoint>,
    }

    impl PriceIndexTrait for MockPriceIndex {
        fn latest_nav(&self, isin: &str, on_or_before: NaiveDate) -> Result<Option<PricePoint>> {
            Ok(self
                .prices
                .iter()
                .filter(|p| p.isin == isin && p.price_date <= on_or_before)
                .max_by_key(|p| p.price_date)
                .cloned())
        }

        fn price_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
            let mut dates: Vec<NaiveDate> = self
                .prices
                .iter()
                .map(|p| p.price_date)
                .filter(|d| *d >= start && *d <= end)
                .collect();
            dates.sort();
            dates.dedup();
            Ok(dates)
        }

        fn latest_price_date(&self) -> Result<Option<NaiveDate>> {
            Ok(self.prices.iter().map(|p| p.price_date).max())
        }
    }

    struct MockCurrentHoldings;

    impl CurrentHoldingsTrait for MockCurrentHoldings {
        fn current_holdings(&self, _client_code: &str) -> Result<Vec<InstrumentHolding>> {
            Ok(Vec::new())
        }

        fn clients_with_holdings(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct MockTimeSeriesRepository {
        rows: Mutex<HashMap<String, PortfolioValuationRow>>,
    }

    #[async_trait]
    impl TimeSeriesRepositoryTrait for MockTimeSeriesRepository {
        async fn save_rows(&self, rows: &[PortfolioValuationRow]) -> Result<()> {
            let mut stored = self.rows.lock().unwrap();
            for row in rows {
                stored.insert(row.id.clone(), row.clone());
            }
            Ok(())
        }

        fn get_series(
            &self,
            client_code: &str,
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        ) -> Result<Vec<PortfolioValuationRow>> {
            let stored = self.rows.lock().unwrap();
            let mut rows: Vec<PortfolioValuationRow> = stored
                .values()
                .filter(|r| r.client_code == client_code)
                .filter(|r| start_date.map_or(true, |s| r.date >= s))
                .filter(|r| end_date.map_or(true, |e| r.date <= e))
                .cloned()
                .collect();
            rows.sort_by_key(|r| r.date);
            Ok(rows)
        }

        fn load_latest_date(&self, client_code: &str) -> Result<Option<NaiveDate>> {
            let stored = self.rows.lock().unwrap();
            Ok(stored
                .values()
                .filter(|r| r.client_code == client_code)
                .map(|r| r.date)
                .max())
        }

        fn get_rows_on_date(
            &self,
            client_codes: &[String],
            date: NaiveDate,
        ) -> Result<Vec<PortfolioValuationRow>> {
            let stored = self.rows.lock().unwrap();
            let mut rows: Vec<PortfolioValuationRow> = stored
                .values()
                .filter(|r| r.date == date && client_codes.contains(&r.client_code))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.portfolio_value.cmp(&a.portfolio_value));
            Ok(rows)
        }
    }

    // --- Fixtures ---

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(
        seq: i64,
        client_code: &str,
        isin: &str,
        transaction_date: NaiveDate,
        transaction_type: TransactionType,
        units: Decimal,
        nav: Decimal,
    ) -> TransactionRecord {
        TransactionRecord {
            id: format!("TX-{}", seq),
            client_code: client_code.to_string(),
            isin: isin.to_string(),
            transaction_date,
            transaction_type,
            units,
            nav,
            amount: units * nav,
            seq,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn price(isin: &str, d: NaiveDate, nav: Decimal) -> PricePoint {
        PricePoint {
            isin: isin.to_string(),
            price_date: d,
            nav,
        }
    }

    fn service(
        transactions: Vec<TransactionRecord>,
        prices: Vec<PricePoint>,
    ) -> (ValuationService, Arc<MockTimeSeriesRepository>) {
        let ledger: Arc<dyn TransactionLedgerTrait> = Arc::new(MockLedger { transactions });
        let price_index: Arc<dyn PriceIndexTrait> = Arc::new(MockPriceIndex { prices });
        let repository = Arc::new(MockTimeSeriesRepository::default());

        let resolver = HoldingsResolver::new(
            HoldingsReconstructor::new(ledger.clone()),
            LiveHoldingsProjector::new(Arc::new(MockCurrentHoldings)),
            SnapshotPolicy::default(),
        );
        let svc = ValuationService::new(
            resolver,
            ledger,
            price_index,
            repository.clone() as Arc<dyn TimeSeriesRepositoryTrait>,
        );
        (svc, repository)
    }

    #[tokio::test]
    async fn pipeline_produces_rows_on_trading_dates_only() {
        // Buy on the 1st; prices exist on 1st, 2nd, and 5th (gap over 3rd/4th).
        let (svc, repo) = service(
            vec![tx(1, "C001", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(10), dec!(100))],
            vec![
                price("INF001", date(2024, 1, 1), dec!(100)),
                price("INF001", date(2024, 1, 2), dec!(101)),
                price("INF001", date(2024, 1, 5), dec!(99)),
            ],
        );

        let rows = svc.update_history("C001", None, None).await.unwrap();
        assert_eq!(rows.len(), 3);

        // Flat holdings still produce rows on pure market-move days.
        assert_eq!(rows[0].portfolio_value, dec!(1000));
        assert_eq!(rows[0].day_change, Decimal::ZERO);
        assert_eq!(rows[0].cumulative_return_pct, Some(Decimal::ZERO));
        assert_eq!(rows[1].portfolio_value, dec!(1010));
        assert_eq!(rows[1].day_change, dec!(10));
        assert_eq!(rows[2].portfolio_value, dec!(990));
        assert_eq!(rows[2].day_change, dec!(-20));
        assert_eq!(rows[2].cumulative_return_pct, Some(dec!(-1)));
        assert_eq!(rows[2].holdings_count, 1);

        let stored = repo.get_series("C001", None, None).unwrap();
        assert_eq!(stored, rows);
    }

    #[tokio::test]
    async fn dates_before_first_transaction_produce_no_rows() {
        let (svc, _repo) = service(
            vec![tx(1, "C001", "INF001", date(2024, 3, 1), TransactionType::Buy, dec!(10), dec!(50))],
            vec![
                price("INF001", date(2024, 2, 1), dec!(48)),
                price("INF001", date(2024, 3, 1), dec!(50)),
            ],
        );

        // Range defaults to the first transaction date, so 2024-02-01 is out.
        let rows = svc.update_history("C001", None, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(2024, 3, 1));
    }

    #[tokio::test]
    async fn unpriceable_dates_are_skipped_not_fatal() {
        // The instrument's first price appears two days after the buy.
        let (svc, _repo) = service(
            vec![tx(1, "C001", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(10), dec!(50))],
            vec![
                price("INF002", date(2024, 1, 1), dec!(1)),
                price("INF001", date(2024, 1, 3), dec!(52)),
            ],
        );

        let rows = svc.update_history("C001", None, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(2024, 1, 3));
        assert_eq!(rows[0].portfolio_value, dec!(520));
    }

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let (svc, repo) = service(
            vec![tx(1, "C001", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(10), dec!(100))],
            vec![
                price("INF001", date(2024, 1, 1), dec!(100)),
                price("INF001", date(2024, 1, 2), dec!(110)),
            ],
        );

        let first = svc.update_history("C001", None, None).await.unwrap();
        let second = svc.update_history("C001", None, None).await.unwrap();

        let stored = repo.get_series("C001", None, None).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.portfolio_value, b.portfolio_value);
            assert_eq!(a.id, b.id);
        }
    }

    #[tokio::test]
    async fn batch_isolates_failing_clients() {
        let mut transactions = vec![
            tx(1, "GOOD", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(10), dec!(100)),
            // BAD sells more than it ever bought: InconsistentLedger.
            tx(2, "BAD", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(5), dec!(100)),
            tx(3, "BAD", "INF001", date(2024, 1, 2), TransactionType::Sell, dec!(50), dec!(100)),
        ];
        transactions.sort_by_key(|t| t.seq);
        let (svc, repo) = service(
            transactions,
            vec![
                price("INF001", date(2024, 1, 1), dec!(100)),
                price("INF001", date(2024, 1, 2), dec!(105)),
            ],
        );

        let outcome = svc
            .update_batch(&["GOOD".to_string(), "BAD".to_string()], None, None)
            .await;

        assert_eq!(outcome.succeeded, vec!["GOOD".to_string()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].client_code, "BAD");
        assert!(outcome.failed[0].reason.contains("Inconsistent ledger"));

        // The healthy client's rows were persisted regardless.
        assert_eq!(repo.get_series("GOOD", None, None).unwrap().len(), 2);
        assert!(repo.get_series("BAD", None, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_without_transactions_yields_empty_series() {
        let (svc, _repo) = service(vec![], vec![price("INF001", date(2024, 1, 1), dec!(1))]);
        let rows = svc.update_history("C001", None, None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn read_back_honors_date_range() {
        let (svc, _repo) = service(
            vec![tx(1, "C001", "INF001", date(2024, 1, 1), TransactionType::Buy, dec!(10), dec!(100))],
            vec![
                price("INF001", date(2024, 1, 1), dec!(100)),
                price("INF001", date(2024, 1, 2), dec!(101)),
                price("INF001", date(2024, 1, 3), dec!(102)),
            ],
        );
        svc.update_history("C001", None, None).await.unwrap();

        let window = svc
            .get_history("C001", Some(date(2024, 1, 2)), Some(date(2024, 1, 3)))
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].date, date(2024, 1, 2));
    }
}

//! Per-client valuation pipeline and batch orchestration.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::Result;
use crate::holdings::HoldingsResolver;
use crate::prices::PriceIndexTrait;
use crate::transactions::TransactionLedgerTrait;

use super::return_series::build_return_series;
use super::valuation_calculator::value_snapshot;
use super::valuation_model::{BatchOutcome, ClientFailure, PortfolioValuationRow, SnapshotValuation};
use super::valuation_traits::TimeSeriesRepositoryTrait;

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Computes and persists the valuation time series for one client.
    ///
    /// When `start_date` is omitted the series begins at the client's first
    /// transaction; when `end_date` is omitted it runs to the latest
    /// published price date. Rows are upserted idempotently, so partial or
    /// repeated runs over the same range are safe.
    ///
    /// Returns the rows that were computed and stored.
    async fn update_history(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>>;

    /// Runs `update_history` for several clients concurrently.
    ///
    /// Pipelines are independent; one client's failure is recorded in the
    /// outcome and never aborts the others.
    async fn update_batch(
        &self,
        client_codes: &[String],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BatchOutcome;

    /// Reads back the stored series for a client.
    fn get_history(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>>;
}

#[derive(Clone)]
pub struct ValuationService {
    resolver: HoldingsResolver,
    ledger: Arc<dyn TransactionLedgerTrait>,
    price_index: Arc<dyn PriceIndexTrait>,
    repository: Arc<dyn TimeSeriesRepositoryTrait>,
}

impl ValuationService {
    pub fn new(
        resolver: HoldingsResolver,
        ledger: Arc<dyn TransactionLedgerTrait>,
        price_index: Arc<dyn PriceIndexTrait>,
        repository: Arc<dyn TimeSeriesRepositoryTrait>,
    ) -> Self {
        Self {
            resolver,
            ledger,
            price_index,
            repository,
        }
    }

    /// Resolves the effective date range for a client's backfill.
    fn resolve_range(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let start = match start_date {
            Some(d) => d,
            None => match self.ledger.first_transaction_date(client_code)? {
                Some(d) => d,
                None => {
                    warn!("No transactions for client {}", client_code);
                    return Ok(None);
                }
            },
        };
        let end = match end_date {
            Some(d) => d,
            None => match self.price_index.latest_price_date()? {
                Some(d) => d,
                None => {
                    warn!("Price history is empty; nothing to value");
                    return Ok(None);
                }
            },
        };
        if start > end {
            return Ok(None);
        }
        Ok(Some((start, end)))
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn update_history(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>> {
        let started = Instant::now();

        let Some((start, end)) = self.resolve_range(client_code, start_date, end_date)? else {
            return Ok(Vec::new());
        };

        // Trading dates only: weekends and price holidays produce no rows.
        let dates = self.price_index.price_dates(start, end)?;
        if dates.is_empty() {
            debug!(
                "No price dates between {} and {} for client {}",
                start, end, client_code
            );
            return Ok(Vec::new());
        }

        let today = Utc::now().date_naive();
        let snapshots = self
            .resolver
            .snapshots_for_dates(client_code, &dates, today)?;

        let mut valuations: Vec<SnapshotValuation> = Vec::with_capacity(snapshots.len());
        for snapshot in &snapshots {
            if snapshot.is_empty() {
                debug!(
                    "No holdings for client {} on {}",
                    client_code, snapshot.as_of_date
                );
                continue;
            }
            let valuation = value_snapshot(snapshot, self.price_index.as_ref())?;
            if valuation.priced.is_empty() {
                // Nothing priceable on this date yet; skip rather than
                // persist a zero-value row.
                debug!(
                    "No priceable holdings for client {} on {}",
                    client_code, snapshot.as_of_date
                );
                continue;
            }
            valuations.push(valuation);
        }

        let rows = build_return_series(&valuations);
        if !rows.is_empty() {
            self.repository.save_rows(&rows).await?;
        }

        info!(
            "Updated {} time-series rows for client {} ({} to {}) in {:?}",
            rows.len(),
            client_code,
            start,
            end,
            started.elapsed()
        );
        Ok(rows)
    }

    async fn update_batch(
        &self,
        client_codes: &[String],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BatchOutcome {
        let results = join_all(client_codes.iter().map(|client_code| async move {
            let result = self.update_history(client_code, start_date, end_date).await;
            (client_code.clone(), result)
        }))
        .await;

        let mut outcome = BatchOutcome::default();
        for (client_code, result) in results {
            match result {
                Ok(_) => outcome.succeeded.push(client_code),
                Err(e) => {
                    error!("Client {} pipeline failed: {}", client_code, e);
                    outcome.failed.push(ClientFailure {
                        client_code,
                        reason: e.to_string(),
                    });
                }
            }
        }
        info!(
            "Batch run finished: {}/{} clients succeeded",
            outcome.succeeded.len(),
            client_codes.len()
        );
        outcome
    }

    fn get_history(
        &self,
        client_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioValuationRow>> {
        debug!(
            "Loading stored series for client {} from {:?} to {:?}",
            client_code, start_date, end_date
        );
        self.repository.get_series(client_code, start_date, end_date)
    }
}

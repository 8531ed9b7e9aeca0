//! Derives day-over-day and cumulative return metrics from ordered valuations.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use crate::constants::DECIMAL_PRECISION;

use super::valuation_model::{MonthlyReturn, PortfolioValuationRow, SnapshotValuation};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn pct(numerator: Decimal, denominator: Decimal) -> Decimal {
    (numerator / denominator * HUNDRED).round_dp(DECIMAL_PRECISION)
}

/// Builds the persisted return series from date-ordered valuations.
///
/// Row 0 always has day_change = 0 and cumulative_return_pct = 0; later rows
/// are relative to the previous row and to the first row of the *requested*
/// window respectively. Callers needing inception-relative cumulative return
/// must request the full window from inception.
pub fn build_return_series(valuations: &[SnapshotValuation]) -> Vec<PortfolioValuationRow> {
    let calculated_at = Utc::now().naive_utc();
    let first_value = valuations.first().map(|v| v.portfolio_value);

    let mut rows = Vec::with_capacity(valuations.len());
    let mut previous_value: Option<Decimal> = None;

    for valuation in valuations {
        let value = valuation.portfolio_value;

        let (day_change, day_change_pct) = match previous_value {
            None => (Decimal::ZERO, Some(Decimal::ZERO)),
            Some(prev) if prev == Decimal::ZERO => (value - prev, None),
            Some(prev) => {
                let change = value - prev;
                (change, Some(pct(change, prev)))
            }
        };

        let cumulative_return_pct = match first_value {
            Some(first) if first != Decimal::ZERO => Some(pct(value - first, first)),
            Some(_) if previous_value.is_none() => Some(Decimal::ZERO),
            _ => None,
        };

        rows.push(PortfolioValuationRow {
            id: PortfolioValuationRow::make_id(&valuation.client_code, valuation.date),
            client_code: valuation.client_code.clone(),
            date: valuation.date,
            portfolio_value: value,
            invested_value: valuation.invested_value,
            day_change,
            day_change_pct,
            cumulative_return_pct,
            holdings_count: valuation.holdings_count(),
            calculated_at,
        });

        previous_value = Some(value);
    }

    rows
}

/// Aggregates a date-ordered return series into calendar months.
///
/// Each month's return is measured inside the month: its last trading-day
/// value against its first. Best and worst days rank the rows' day changes,
/// which for a month's first row span the boundary from the previous month.
pub fn monthly_returns(rows: &[PortfolioValuationRow]) -> Vec<MonthlyReturn> {
    let mut months = Vec::new();
    let mut start = 0;

    while start < rows.len() {
        let (year, month) = (rows[start].date.year(), rows[start].date.month());
        let mut end = start + 1;
        while end < rows.len()
            && rows[end].date.year() == year
            && rows[end].date.month() == month
        {
            end += 1;
        }
        let group = &rows[start..end];

        let start_value = group[0].portfolio_value;
        let end_value = group[group.len() - 1].portfolio_value;
        let return_pct = if start_value > Decimal::ZERO {
            Some(pct(end_value - start_value, start_value))
        } else {
            None
        };

        let (best_day, worst_day) = if group.len() > 1 {
            let mut best = &group[0];
            let mut worst = &group[0];
            for row in &group[1..] {
                if row.day_change > best.day_change {
                    best = row;
                }
                if row.day_change < worst.day_change {
                    worst = row;
                }
            }
            (Some(best.date), Some(worst.date))
        } else {
            (None, None)
        };

        months.push(MonthlyReturn {
            year,
            month,
            start_value,
            end_value,
            return_pct,
            best_day,
            worst_day,
            trading_days: group.len(),
        });
        start = end;
    }

    months
}

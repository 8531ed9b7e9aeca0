//! Shared setup for repository tests: a tempfile-backed database with the
//! full schema created inline.

use diesel::connection::SimpleConnection;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, DbPool};

const TEST_SCHEMA: &str = "
CREATE TABLE transactions (
    id TEXT PRIMARY KEY NOT NULL,
    client_code TEXT NOT NULL,
    isin TEXT NOT NULL,
    transaction_date TEXT NOT NULL,
    transaction_type TEXT NOT NULL,
    units TEXT NOT NULL,
    nav TEXT NOT NULL,
    amount TEXT NOT NULL,
    seq BIGINT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX idx_transactions_client_date
    ON transactions(client_code, transaction_date);

CREATE TABLE instrument_prices (
    isin TEXT NOT NULL,
    price_date TEXT NOT NULL,
    nav TEXT NOT NULL,
    PRIMARY KEY (isin, price_date)
);

CREATE TABLE holdings (
    client_code TEXT NOT NULL,
    isin TEXT NOT NULL,
    quantity TEXT NOT NULL,
    average_cost TEXT NOT NULL,
    inception_date TEXT NOT NULL,
    PRIMARY KEY (client_code, isin)
);

CREATE TABLE portfolio_timeseries (
    id TEXT PRIMARY KEY NOT NULL,
    client_code TEXT NOT NULL,
    date TEXT NOT NULL,
    portfolio_value TEXT NOT NULL,
    invested_value TEXT NOT NULL,
    day_change TEXT NOT NULL,
    day_change_pct TEXT,
    cumulative_return_pct TEXT,
    holdings_count INTEGER NOT NULL,
    calculated_at TEXT NOT NULL,
    UNIQUE(client_code, date)
);
CREATE INDEX idx_portfolio_ts_client_date
    ON portfolio_timeseries(client_code, date DESC);
";

/// Creates a pooled tempfile database with all tables. The `TempDir` must be
/// kept alive for the duration of the test.
pub(crate) fn create_test_pool() -> (DbPool, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let pool = create_pool(&db_path.to_string_lossy()).expect("failed to create pool");

    let mut conn = get_connection(&pool).expect("failed to get connection");
    conn.batch_execute(TEST_SCHEMA)
        .expect("failed to create test schema");

    (pool, temp_dir)
}

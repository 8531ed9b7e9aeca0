//! SQLite storage implementation for Folionav.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `folionav-core` and contains:
//! - Database connection pooling and a single-writer actor
//! - Repository implementations for the ledger, price index, live holdings,
//!   and the valuation time series
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place where Diesel dependencies exist; `core` is
//! database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Repository implementations
pub mod holdings;
pub mod prices;
pub mod timeseries;
pub mod transactions;

// Re-export database utilities
pub use db::{create_pool, get_connection, spawn_writer, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use holdings::HoldingsRepository;
pub use prices::PriceIndexRepository;
pub use timeseries::TimeSeriesRepository;
pub use transactions::TransactionLedgerRepository;

// Re-export from folionav-core for convenience
pub use folionav_core::errors::{DatabaseError, Error, Result};

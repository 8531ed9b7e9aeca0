//! Folionav Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for computing per-client daily
//! portfolio valuation histories from an append-only transaction ledger and
//! a per-instrument NAV history. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod prices;
pub mod transactions;
pub mod valuation;
pub mod verification;

// Re-export common types from the holdings and valuation modules
pub use holdings::*;
pub use valuation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

use rust_decimal::Decimal;

/// Quantity below which a position is considered fully closed (0.0001).
/// Matches the precision of the upstream transaction feed (4 decimal units).
pub const QUANTITY_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Default freshness window for the live-holdings shortcut, in calendar days.
/// Dates within this many days of "today" are served from the current
/// holdings table instead of a full ledger replay.
pub const DEFAULT_FRESHNESS_WINDOW_DAYS: i64 = 7;

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

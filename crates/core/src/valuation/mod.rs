pub mod return_series;
pub mod valuation_calculator;
pub mod valuation_model;
pub mod valuation_service;
pub mod valuation_traits;

#[cfg(test)]
mod valuation_service_tests;

pub use return_series::*;
pub use valuation_calculator::value_snapshot;
pub use valuation_model::*;
pub use valuation_service::{ValuationService, ValuationServiceTrait};
pub use valuation_traits::TimeSeriesRepositoryTrait;

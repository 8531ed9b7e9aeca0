pub mod model;
pub mod repository;

pub use model::PortfolioTimeseriesDB;
pub use repository::TimeSeriesRepository;

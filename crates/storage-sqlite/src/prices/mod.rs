pub mod model;
pub mod repository;

pub use model::InstrumentPriceDB;
pub use repository::PriceIndexRepository;

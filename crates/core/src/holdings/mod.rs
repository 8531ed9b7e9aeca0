pub mod holdings_model;
pub mod holdings_traits;
pub mod projector;
pub mod reconstructor;
pub mod strategy;


pub use holdings_model::*;
pub use holdings_traits::CurrentHoldingsTrait;
pub use projector::LiveHoldingsProjector;
pub use reconstructor::HoldingsReconstructor;
pub use strategy::{HoldingsResolver, HoldingsStrategy, SnapshotPolicy};

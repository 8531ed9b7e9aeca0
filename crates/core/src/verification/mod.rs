pub mod verification_model;
pub mod verifier;

pub use verification_model::*;
pub use verifier::ConsistencyVerifier;

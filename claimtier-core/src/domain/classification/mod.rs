// claimtier-core/src/domain/classification/mod.rs

pub mod classified;
pub mod classifier;
pub mod tier;

pub use classified::ClassifiedClaim;
pub use classifier::Classifier;
pub use tier::Tier;

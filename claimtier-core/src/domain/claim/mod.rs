// claimtier-core/src/domain/claim/mod.rs

pub mod lineage;
pub mod raw;
pub mod record;

pub use lineage::BatchLineage;
pub use raw::{RawClaimRow, StructuralError, StructuralFailure};
pub use record::{ClaimRecord, ClaimStatus, RecordRef};

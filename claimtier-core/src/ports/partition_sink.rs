// claimtier-core/src/ports/partition_sink.rs

use async_trait::async_trait;
use std::path::Path;

use crate::domain::claim::{BatchLineage, StructuralFailure};
use crate::domain::classification::{ClassifiedClaim, Tier};
use crate::error::ClaimTierError;

/// Where tiered partitions land.
#[async_trait]
pub trait PartitionSink: Send + Sync {
    /// Writes the claims of one tier under `batch_dir`, each row carrying `lineage`.
    /// Empty partitions may be skipped.
    async fn write_partition(
        &self,
        tier: Tier,
        claims: &[ClassifiedClaim],
        lineage: &BatchLineage,
        batch_dir: &Path,
    ) -> Result<(), ClaimTierError>;

    async fn write_structural_failures(
        &self,
        failures: &[StructuralFailure],
        batch_dir: &Path,
    ) -> Result<(), ClaimTierError>;
}

// claimtier-core/src/ports/claim_source.rs

use async_trait::async_trait;
use std::path::Path;

use crate::domain::claim::raw::RawBatch;
use crate::error::ClaimTierError;

/// Where raw batches come from (object storage in production, local CSV files here).
#[async_trait]
pub trait ClaimSource: Send + Sync {
    /// Reads one batch. A batch that cannot be read at all (missing file, missing required
    /// column) is an error; individual bad lines come back in `RawBatch::rejected`.
    async fn load_batch(&self, path: &Path) -> Result<RawBatch, ClaimTierError>;
}

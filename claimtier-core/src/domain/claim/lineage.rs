// claimtier-core/src/domain/claim/lineage.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance stamped on every row a batch writes out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLineage {
    /// Batch label, relative to the input directory (`claims/2024/jan.csv`).
    pub source_file: String,
    pub ingestion_timestamp: DateTime<Utc>,
}

impl BatchLineage {
    pub fn new(source_file: impl Into<String>, ingestion_timestamp: DateTime<Utc>) -> Self {
        Self {
            source_file: source_file.into(),
            ingestion_timestamp,
        }
    }

    /// Stamped with the current wall clock.
    pub fn now(source_file: impl Into<String>) -> Self {
        Self::new(source_file, Utc::now())
    }
}

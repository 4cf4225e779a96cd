// claimtier-core/src/domain/compliance/mod.rs

pub mod config;
pub mod zscore;

pub use config::{MIN_GROUP_SIZE, STDDEV_EPSILON, Z_SCORE_THRESHOLD, ValidationThresholds};
pub use zscore::{GroupAccumulator, GroupStatistics, OutlierFlag, StatisticalOutlierDetector};

// claimtier-core/src/domain/compliance/zscore.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::{MIN_GROUP_SIZE, STDDEV_EPSILON, Z_SCORE_THRESHOLD};
use crate::domain::claim::{ClaimRecord, RecordRef};

/// Running mean / sum of squared deviations (Welford's online algorithm).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupAccumulator {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
}

impl GroupAccumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let old_mean = self.mean;
        self.mean += (value - old_mean) / self.count as f64;
        // M2_new = M2_old + (x - old_mean) * (x - new_mean)
        self.m2 += (value - old_mean) * (value - self.mean);
    }

    /// Sample standard deviation (n - 1). `None` below the minimum group size.
    pub fn sample_stddev(&self) -> Option<f64> {
        if self.count < MIN_GROUP_SIZE {
            return None;
        }
        Some((self.m2.max(0.0) / (self.count - 1) as f64).sqrt())
    }
}

/// Amount distribution of one procedure code within the current batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub group_key: String,
    pub count: u64,
    pub mean: f64,
    /// `None` when the group is too small to have a sample standard deviation.
    pub stddev: Option<f64>,
}

impl GroupStatistics {
    fn from_accumulator(group_key: String, acc: &GroupAccumulator) -> Self {
        Self {
            group_key,
            count: acc.count,
            mean: acc.mean,
            stddev: acc.sample_stddev(),
        }
    }

    /// z-score of `value` against this group, when the group can judge it at all.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        match self.stddev {
            Some(stddev) if stddev > STDDEV_EPSILON => Some((value - self.mean) / stddev),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierFlag {
    pub record: RecordRef,
    /// `None` when the record has no amount or its group cannot judge it.
    pub z_score: Option<f64>,
    pub is_outlier: bool,
}

/// Per-procedure-code z-score model, rebuilt from scratch for every batch.
#[derive(Debug, Clone)]
pub struct StatisticalOutlierDetector {
    threshold: f64,
}

impl Default for StatisticalOutlierDetector {
    fn default() -> Self {
        Self {
            threshold: Z_SCORE_THRESHOLD,
        }
    }
}

impl StatisticalOutlierDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Reduce step: one pass over the batch, every record counted in its own group
    /// (self-inclusive, not leave-one-out). Records lacking an amount or a procedure code
    /// belong to no group.
    pub fn fit(&self, batch: &[ClaimRecord]) -> BTreeMap<String, GroupStatistics> {
        let mut accumulators: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();
        for record in batch {
            if let (Some(key), Some(amount)) = (record.group_key(), record.claim_amount) {
                accumulators.entry(key).or_default().push(amount);
            }
        }

        accumulators
            .into_iter()
            .map(|(key, acc)| {
                (
                    key.to_string(),
                    GroupStatistics::from_accumulator(key.to_string(), &acc),
                )
            })
            .collect()
    }

    /// Scores one record against fitted statistics. Never fails: zero spread, singleton groups
    /// and missing inputs all mean "not an outlier".
    pub fn score(
        &self,
        record: &ClaimRecord,
        statistics: &BTreeMap<String, GroupStatistics>,
    ) -> OutlierFlag {
        let z_score = record
            .group_key()
            .and_then(|key| statistics.get(key))
            .zip(record.claim_amount)
            .and_then(|(stats, amount)| stats.z_score(amount));

        OutlierFlag {
            record: record.reference.clone(),
            z_score,
            is_outlier: z_score.is_some_and(|z| z.abs() > self.threshold),
        }
    }
}

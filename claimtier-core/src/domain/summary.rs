// claimtier-core/src/domain/summary.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::classification::{ClassifiedClaim, Tier};
use crate::domain::rules::RuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Count,
    Percent,
}

/// One numeric value per metric name, tagged with the batch it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub source: String,
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch: String,
    /// Every input row, structural failures included.
    pub total_records: usize,
    pub structural_failures: usize,
    pub gold_records: usize,
    pub silver_records: usize,
    pub quarantine_records: usize,
    pub violations_by_rule: BTreeMap<RuleId, usize>,
    pub data_quality_score: f64,
    pub anomaly_rate: f64,
}

impl BatchSummary {
    pub fn compute(batch: &str, claims: &[ClassifiedClaim], structural_failures: usize) -> Self {
        let count = |tier: Tier| claims.iter().filter(|c| c.tier == tier).count();
        let gold = count(Tier::Gold);
        let silver = count(Tier::Silver);
        let quarantine = count(Tier::Quarantine);

        let mut violations_by_rule = BTreeMap::new();
        for violation in claims.iter().flat_map(|c| &c.violations) {
            *violations_by_rule.entry(violation.rule).or_insert(0) += 1;
        }

        Self {
            batch: batch.to_string(),
            total_records: claims.len() + structural_failures,
            structural_failures,
            gold_records: gold,
            silver_records: silver,
            quarantine_records: quarantine,
            violations_by_rule,
            data_quality_score: quality_score(gold, claims.len()),
            anomaly_rate: percentage(silver + quarantine, claims.len()),
        }
    }

    /// Records that received a tier (structural failures excluded).
    pub fn scored_records(&self) -> usize {
        self.gold_records + self.silver_records + self.quarantine_records
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Gold => self.gold_records,
            Tier::Silver => self.silver_records,
            Tier::Quarantine => self.quarantine_records,
        }
    }

    pub fn violations_for(&self, rule: RuleId) -> usize {
        self.violations_by_rule.get(&rule).copied().unwrap_or(0)
    }

    /// First folder of the batch label with its trailing slash (`claims/` for
    /// `claims/2024/jan.csv`). `None` for a top-level file.
    pub fn folder_prefix(&self) -> Option<String> {
        self.batch
            .split_once('/')
            .map(|(head, _)| format!("{}/", head))
    }

    /// Flat metric set for the observability collaborator. `AnomalyCount` is the quarantine count.
    ///
    /// Every metric is emitted for the batch label and, when the batch sits in a folder, once
    /// more for the folder prefix so dashboards can query a whole feed.
    pub fn metrics(&self) -> Vec<MetricDatum> {
        let mut metrics = self.metrics_for(&self.batch);
        if let Some(prefix) = self.folder_prefix() {
            metrics.extend(self.metrics_for(&prefix));
        }
        metrics
    }

    fn metrics_for(&self, source: &str) -> Vec<MetricDatum> {
        let datum = |name: &str, value: f64, unit: MetricUnit| MetricDatum {
            name: name.to_string(),
            value,
            unit,
            source: source.to_string(),
        };

        vec![
            datum("TotalRecords", self.total_records as f64, MetricUnit::Count),
            datum("GoldRecords", self.gold_records as f64, MetricUnit::Count),
            datum("SilverRecords", self.silver_records as f64, MetricUnit::Count),
            datum("QuarantineRecords", self.quarantine_records as f64, MetricUnit::Count),
            datum("AnomalyCount", self.quarantine_records as f64, MetricUnit::Count),
            datum("StructuralFailures", self.structural_failures as f64, MetricUnit::Count),
            datum("DataQualityScore", self.data_quality_score, MetricUnit::Percent),
            datum("AnomalyRate", self.anomaly_rate, MetricUnit::Percent),
        ]
    }
}

/// `100 × gold / scored`, clamped to [0, 100]. No data is not bad data: an empty batch scores 100.
pub fn quality_score(gold: usize, scored: usize) -> f64 {
    if scored == 0 {
        return 100.0;
    }
    (100.0 * gold as f64 / scored as f64).clamp(0.0, 100.0)
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (100.0 * part as f64 / whole as f64).clamp(0.0, 100.0)
}

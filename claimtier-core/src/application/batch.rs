// claimtier-core/src/application/batch.rs

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::domain::claim::raw::RawBatch;
use crate::domain::claim::{ClaimRecord, StructuralFailure};
use crate::domain::classification::{ClassifiedClaim, Classifier, Tier};
use crate::domain::compliance::{StatisticalOutlierDetector, ValidationThresholds};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleSet, RuleViolation};
use crate::domain::summary::BatchSummary;

/// Tiered partitions of one batch plus its summary. Partitions keep input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub gold: Vec<ClassifiedClaim>,
    pub silver: Vec<ClassifiedClaim>,
    pub quarantine: Vec<ClassifiedClaim>,
    pub structural_failures: Vec<StructuralFailure>,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    pub fn partition(&self, tier: Tier) -> &[ClassifiedClaim] {
        match tier {
            Tier::Gold => &self.gold,
            Tier::Silver => &self.silver,
            Tier::Quarantine => &self.quarantine,
        }
    }
}

/// End-to-end validation of a single in-memory batch.
///
/// Phases: parse → rules (parallel) → fit (reduce, sequential and complete before scoring)
/// → score + classify (parallel) → partition → summary. Nothing is kept between runs.
pub struct BatchValidator {
    rules: RuleSet,
    detector: StatisticalOutlierDetector,
    classifier: Classifier,
}

impl BatchValidator {
    /// Fails fast on invalid thresholds, before any record is looked at.
    pub fn new(thresholds: &ValidationThresholds, as_of: NaiveDate) -> Result<Self, DomainError> {
        Ok(Self::with_components(
            RuleSet::standard(thresholds, as_of)?,
            StatisticalOutlierDetector::new(),
            Classifier,
        ))
    }

    pub fn with_components(
        rules: RuleSet,
        detector: StatisticalOutlierDetector,
        classifier: Classifier,
    ) -> Self {
        Self {
            rules,
            detector,
            classifier,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[instrument(skip(self, batch), fields(batch = %batch.name, rows = batch.input_rows()))]
    pub fn run(&self, batch: &RawBatch) -> BatchOutcome {
        let parsed: Vec<Result<ClaimRecord, StructuralFailure>> =
            batch.rows.par_iter().map(|row| row.parse()).collect();

        let mut structural_failures = batch.rejected.clone();
        let mut records = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(record) => records.push(record),
                Err(failure) => structural_failures.push(failure),
            }
        }
        structural_failures.sort_by_key(|f| f.row);

        self.classify_records(&batch.name, records, structural_failures)
    }

    /// Same as `run` for records that are already typed.
    pub fn classify_records(
        &self,
        batch_name: &str,
        records: Vec<ClaimRecord>,
        structural_failures: Vec<StructuralFailure>,
    ) -> BatchOutcome {
        let violations: Vec<Vec<RuleViolation>> = records
            .par_iter()
            .map(|record| self.rules.evaluate(record))
            .collect();

        let statistics = self.detector.fit(&records);
        debug!(groups = statistics.len(), "Group statistics fitted");

        let classified: Vec<ClassifiedClaim> = records
            .into_par_iter()
            .zip(violations.into_par_iter())
            .map(|(record, violations)| {
                let outlier = self.detector.score(&record, &statistics);
                let tier = self.classifier.classify(&record, &violations, &outlier);
                let group = record
                    .group_key()
                    .and_then(|key| statistics.get(key))
                    .cloned();
                ClassifiedClaim {
                    record,
                    violations,
                    outlier,
                    group,
                    tier,
                }
            })
            .collect();

        let summary = BatchSummary::compute(batch_name, &classified, structural_failures.len());
        info!(
            gold = summary.gold_records,
            silver = summary.silver_records,
            quarantine = summary.quarantine_records,
            structural = summary.structural_failures,
            score = summary.data_quality_score,
            "Batch classified"
        );

        let mut outcome = BatchOutcome {
            gold: Vec::new(),
            silver: Vec::new(),
            quarantine: Vec::new(),
            structural_failures,
            summary,
        };
        for claim in classified {
            match claim.tier {
                Tier::Gold => outcome.gold.push(claim),
                Tier::Silver => outcome.silver.push(claim),
                Tier::Quarantine => outcome.quarantine.push(claim),
            }
        }
        outcome
    }
}

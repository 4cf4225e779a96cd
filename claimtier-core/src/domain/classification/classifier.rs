// claimtier-core/src/domain/classification/classifier.rs

use super::tier::Tier;
use crate::domain::claim::ClaimRecord;
use crate::domain::compliance::OutlierFlag;
use crate::domain::rules::RuleViolation;

/// Merges rule results and the outlier flag. Rule violations win over statistical anomaly:
/// an explainable defect is reported as such, not as an outlier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn classify(
        &self,
        _record: &ClaimRecord,
        violations: &[RuleViolation],
        outlier_flag: &OutlierFlag,
    ) -> Tier {
        if !violations.is_empty() {
            Tier::Silver
        } else if outlier_flag.is_outlier {
            Tier::Quarantine
        } else {
            Tier::Gold
        }
    }
}

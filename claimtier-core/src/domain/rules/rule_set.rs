// claimtier-core/src/domain/rules/rule_set.rs

use chrono::NaiveDate;

use super::checks::{
    AmountUpperBound, FutureServiceDate, GenderCode, LateSubmission, NonNegativeAmount, NpiFormat,
    RecognizedStatus, RequiredField, Rule, SubmissionBeforeService, ZipFormat,
};
use super::rule::RuleViolation;
use crate::domain::claim::ClaimRecord;
use crate::domain::compliance::ValidationThresholds;
use crate::domain::error::DomainError;

/// Ordered registry of independent checks.
///
/// The order only drives reporting (violations come back in registration order); since no rule
/// reads another rule's outcome, reordering never changes which violations a record gets.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The production catalogue for claims processed on `as_of`.
    pub fn standard(
        thresholds: &ValidationThresholds,
        as_of: NaiveDate,
    ) -> Result<Self, DomainError> {
        thresholds.ensure_valid()?;

        let npi = NpiFormat::new().map_err(|e| DomainError::RuleDefinition(e.to_string()))?;
        let zip = ZipFormat::new().map_err(|e| DomainError::RuleDefinition(e.to_string()))?;

        Ok(Self::empty()
            .with_rule(RequiredField::member_id())
            .with_rule(RequiredField::provider_npi())
            .with_rule(RequiredField::cpt_code())
            .with_rule(RequiredField::icd10_code())
            .with_rule(RequiredField::claim_amount())
            .with_rule(npi)
            .with_rule(zip)
            .with_rule(GenderCode)
            .with_rule(NonNegativeAmount)
            .with_rule(AmountUpperBound::new(thresholds.max_claim_amount))
            .with_rule(FutureServiceDate::new(as_of))
            .with_rule(SubmissionBeforeService)
            .with_rule(LateSubmission::new(thresholds.max_submission_lag_days))
            .with_rule(RecognizedStatus))
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every violation of `record`, not just the first.
    pub fn evaluate(&self, record: &ClaimRecord) -> Vec<RuleViolation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.check(record).map(|reason| RuleViolation {
                    rule: rule.id(),
                    record: record.reference.clone(),
                    reason,
                })
            })
            .collect()
    }
}

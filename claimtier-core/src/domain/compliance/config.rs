// claimtier-core/src/domain/compliance/config.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

/// |z| above this is an outlier (three-sigma convention). Not configurable.
pub const Z_SCORE_THRESHOLD: f64 = 3.0;

/// Groups smaller than this have no usable standard deviation. Not configurable.
pub const MIN_GROUP_SIZE: u64 = 2;

/// Standard deviations at or below this count as zero (identical amounts).
pub const STDDEV_EPSILON: f64 = 1e-9;

pub const DEFAULT_MAX_CLAIM_AMOUNT: f64 = 1_000_000.0;
pub const DEFAULT_MAX_SUBMISSION_LAG_DAYS: i64 = 365;

/// The tunable part of the rule set.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ValidationThresholds {
    #[validate(range(exclusive_min = 0.0, message = "max_claim_amount must be positive"))]
    #[serde(default = "default_max_claim_amount")]
    pub max_claim_amount: f64,

    #[validate(range(min = 0, message = "max_submission_lag_days cannot be negative"))]
    #[serde(default = "default_max_submission_lag_days")]
    pub max_submission_lag_days: i64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_claim_amount: DEFAULT_MAX_CLAIM_AMOUNT,
            max_submission_lag_days: DEFAULT_MAX_SUBMISSION_LAG_DAYS,
        }
    }
}

impl ValidationThresholds {
    /// Fails before any record is touched: a bad threshold would taint every classification.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))?;
        if !self.max_claim_amount.is_finite() {
            return Err(DomainError::InvalidConfiguration(format!(
                "max_claim_amount must be finite, got {}",
                self.max_claim_amount
            )));
        }
        Ok(())
    }
}

fn default_max_claim_amount() -> f64 {
    DEFAULT_MAX_CLAIM_AMOUNT
}

fn default_max_submission_lag_days() -> i64 {
    DEFAULT_MAX_SUBMISSION_LAG_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let thresholds = ValidationThresholds::default();
        assert_eq!(thresholds.max_claim_amount, 1_000_000.0);
        assert_eq!(thresholds.max_submission_lag_days, 365);
        assert!(thresholds.ensure_valid().is_ok());
    }

    #[test]
    fn test_negative_amount_bound_rejected() {
        let thresholds = ValidationThresholds {
            max_claim_amount: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            thresholds.ensure_valid(),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_lag_rejected() {
        let thresholds = ValidationThresholds {
            max_submission_lag_days: -5,
            ..Default::default()
        };
        assert!(thresholds.ensure_valid().is_err());
    }

    #[test]
    fn test_non_finite_bound_rejected() {
        let thresholds = ValidationThresholds {
            max_claim_amount: f64::INFINITY,
            ..Default::default()
        };
        assert!(thresholds.ensure_valid().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let thresholds: ValidationThresholds = serde_yaml::from_str("max_claim_amount: 50000")?;
        assert_eq!(thresholds.max_claim_amount, 50_000.0);
        assert_eq!(thresholds.max_submission_lag_days, 365);
        Ok(())
    }
}

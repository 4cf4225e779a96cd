// claimtier-core/src/domain/classification/classified.rs

use serde::{Deserialize, Serialize};

use super::tier::Tier;
use crate::domain::claim::ClaimRecord;
use crate::domain::compliance::{GroupStatistics, OutlierFlag};
use crate::domain::rules::RuleViolation;

/// A record together with everything that decided its tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedClaim {
    pub record: ClaimRecord,
    pub violations: Vec<RuleViolation>,
    pub outlier: OutlierFlag,
    pub group: Option<GroupStatistics>,
    pub tier: Tier,
}

impl ClassifiedClaim {
    /// Rule codes joined the way the silver partition stores them: `INVALID_NPI;NEGATIVE_AMOUNT;`
    pub fn dq_issues(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{};", v.rule))
            .collect()
    }

    pub fn anomaly_details(&self) -> Option<String> {
        let z = self.outlier.z_score?;
        let group = self.group.as_ref()?;
        Some(format!(
            "Z-score: {:.4} | Avg: {:.2} | StdDev: {:.2}",
            z,
            group.mean,
            group.stddev.unwrap_or_default()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::{ClaimStatus, RecordRef};
    use crate::domain::rules::RuleId;

    #[test]
    fn test_dq_issues_and_details() {
        let reference = RecordRef {
            row: 1,
            claim_id: "CLM1".into(),
        };
        let record = ClaimRecord {
            reference: reference.clone(),
            member_id: None,
            provider_id: None,
            provider_npi: Some("12345".into()),
            cpt_code: Some("99213".into()),
            icd10_code: None,
            claim_amount: Some(920.0),
            service_date: None,
            submission_date: None,
            status: ClaimStatus::Paid,
            denial_reason: None,
            patient_dob: None,
            patient_zip: None,
            patient_gender: None,
        };
        let claim = ClassifiedClaim {
            record,
            violations: vec![
                RuleViolation {
                    rule: RuleId::MissingMemberId,
                    record: reference.clone(),
                    reason: "member_id is missing".into(),
                },
                RuleViolation {
                    rule: RuleId::InvalidNpi,
                    record: reference.clone(),
                    reason: "bad npi".into(),
                },
            ],
            outlier: OutlierFlag {
                record: reference,
                z_score: Some(17.5),
                is_outlier: true,
            },
            group: Some(GroupStatistics {
                group_key: "99213".into(),
                count: 10,
                mean: 185.0,
                stddev: Some(42.0),
            }),
            tier: Tier::Silver,
        };

        assert_eq!(claim.dq_issues(), "MISSING_MEMBER_ID;INVALID_NPI;");
        assert_eq!(
            claim.anomaly_details().as_deref(),
            Some("Z-score: 17.5000 | Avg: 185.00 | StdDev: 42.00")
        );
    }
}

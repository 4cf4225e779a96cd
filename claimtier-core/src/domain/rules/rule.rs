// claimtier-core/src/domain/rules/rule.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::claim::RecordRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Required,
    Format,
    Amount,
    Date,
    Status,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Format => "format",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Status => "status",
        }
    }
}

/// Stable identifiers of the data-quality rules. The declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    MissingMemberId,
    MissingNpi,
    MissingCpt,
    MissingDiagnosis,
    MissingAmount,
    InvalidNpi,
    InvalidZip,
    InvalidGender,
    NegativeAmount,
    ExcessiveAmount,
    FutureServiceDate,
    SubmissionBeforeService,
    LateSubmission,
    InvalidStatus,
}

impl RuleId {
    pub const ALL: [RuleId; 14] = [
        Self::MissingMemberId,
        Self::MissingNpi,
        Self::MissingCpt,
        Self::MissingDiagnosis,
        Self::MissingAmount,
        Self::InvalidNpi,
        Self::InvalidZip,
        Self::InvalidGender,
        Self::NegativeAmount,
        Self::ExcessiveAmount,
        Self::FutureServiceDate,
        Self::SubmissionBeforeService,
        Self::LateSubmission,
        Self::InvalidStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingMemberId => "MISSING_MEMBER_ID",
            Self::MissingNpi => "MISSING_NPI",
            Self::MissingCpt => "MISSING_CPT",
            Self::MissingDiagnosis => "MISSING_DIAGNOSIS",
            Self::MissingAmount => "MISSING_AMOUNT",
            Self::InvalidNpi => "INVALID_NPI",
            Self::InvalidZip => "INVALID_ZIP",
            Self::InvalidGender => "INVALID_GENDER",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ExcessiveAmount => "EXCESSIVE_AMOUNT",
            Self::FutureServiceDate => "FUTURE_SERVICE_DATE",
            Self::SubmissionBeforeService => "SUBMISSION_BEFORE_SERVICE",
            Self::LateSubmission => "LATE_SUBMISSION",
            Self::InvalidStatus => "INVALID_STATUS",
        }
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            Self::MissingMemberId
            | Self::MissingNpi
            | Self::MissingCpt
            | Self::MissingDiagnosis
            | Self::MissingAmount => RuleCategory::Required,
            Self::InvalidNpi | Self::InvalidZip | Self::InvalidGender => RuleCategory::Format,
            Self::NegativeAmount | Self::ExcessiveAmount => RuleCategory::Amount,
            Self::FutureServiceDate | Self::SubmissionBeforeService | Self::LateSubmission => {
                RuleCategory::Date
            }
            Self::InvalidStatus => RuleCategory::Status,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("Unknown rule id: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: RuleId,
    pub record: RecordRef,
    pub reason: String,
}

// claimtier-core/src/domain/claim/record.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Adjudication status of a claim. Anything outside the three known values is kept verbatim
/// so the status rule can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Paid,
    Denied,
    Pending,
    Unrecognized(String),
}

impl ClaimStatus {
    /// Case-sensitive on purpose: upstream emits upper-case codes, "paid" is a data defect.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("PAID") => Self::Paid,
            Some("DENIED") => Self::Denied,
            Some("PENDING") => Self::Pending,
            Some(other) => Self::Unrecognized(other.to_string()),
            None => Self::Unrecognized(String::new()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "PAID",
            Self::Denied => "DENIED",
            Self::Pending => "PENDING",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable pointer back to the input row: position in the batch plus the claim id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub row: usize,
    pub claim_id: String,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.claim_id, self.row)
    }
}

/// One typed claim line. Optional fields are `None` when the cell was absent or blank;
/// the rule set decides whether that is a defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub reference: RecordRef,
    pub member_id: Option<String>,
    pub provider_id: Option<String>,
    pub provider_npi: Option<String>,
    pub cpt_code: Option<String>,
    pub icd10_code: Option<String>,
    pub claim_amount: Option<f64>,
    pub service_date: Option<NaiveDate>,
    pub submission_date: Option<NaiveDate>,
    pub status: ClaimStatus,
    pub denial_reason: Option<String>,
    pub patient_dob: Option<NaiveDate>,
    pub patient_zip: Option<String>,
    pub patient_gender: Option<String>,
}

impl ClaimRecord {
    pub fn claim_id(&self) -> &str {
        &self.reference.claim_id
    }

    /// Group key for the outlier model.
    pub fn group_key(&self) -> Option<&str> {
        self.cpt_code.as_deref()
    }

    /// Days between service and submission, when both dates are known.
    pub fn submission_lag_days(&self) -> Option<i64> {
        match (self.service_date, self.submission_date) {
            (Some(service), Some(submitted)) => Some((submitted - service).num_days()),
            _ => None,
        }
    }
}

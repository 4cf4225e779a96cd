// claimtier-core/src/domain/claim/raw.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{ClaimRecord, ClaimStatus, RecordRef};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns a batch header must carry. A batch missing one of these is unreadable as a whole.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "claim_id",
    "member_id",
    "provider_npi",
    "cpt_code",
    "icd10_code",
    "claim_amount",
    "service_date",
    "submission_date",
    "claim_status",
];

/// Columns read when present, `NULL` otherwise.
pub const OPTIONAL_COLUMNS: [&str; 5] = [
    "provider_id",
    "denial_reason",
    "patient_dob",
    "patient_zip",
    "patient_gender",
];

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StructuralError {
    #[error("row has no claim_id")]
    MissingClaimId,
    #[error("claim_amount '{value}' is not a number")]
    MalformedAmount { value: String },
    #[error("{column} '{value}' is not a {DATE_FORMAT} date")]
    MalformedDate { column: String, value: String },
    #[error("line rejected by reader: {reason}")]
    RejectedLine { reason: String },
}

/// A row that never became a `ClaimRecord`. Reported, never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFailure {
    pub row: usize,
    pub claim_id: Option<String>,
    pub error: StructuralError,
}

/// Untyped cells as handed over by a `ClaimSource`. Every cell is optional text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClaimRow {
    pub row: usize,
    pub claim_id: Option<String>,
    pub member_id: Option<String>,
    pub provider_id: Option<String>,
    pub provider_npi: Option<String>,
    pub cpt_code: Option<String>,
    pub icd10_code: Option<String>,
    pub claim_amount: Option<String>,
    pub service_date: Option<String>,
    pub submission_date: Option<String>,
    pub claim_status: Option<String>,
    pub denial_reason: Option<String>,
    pub patient_dob: Option<String>,
    pub patient_zip: Option<String>,
    pub patient_gender: Option<String>,
}

/// One input unit: the rows of a single file plus the lines the reader could not split.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    pub name: String,
    pub rows: Vec<RawClaimRow>,
    pub rejected: Vec<StructuralFailure>,
}

impl RawBatch {
    pub fn input_rows(&self) -> usize {
        self.rows.len() + self.rejected.len()
    }
}

impl RawClaimRow {
    /// Map the cells onto the typed schema. Blank cells become `None`; only cells that hold
    /// text of the wrong type are structural.
    pub fn parse(&self) -> Result<ClaimRecord, StructuralFailure> {
        let fail = |error| StructuralFailure {
            row: self.row,
            claim_id: text(&self.claim_id),
            error,
        };

        let claim_id = text(&self.claim_id).ok_or_else(|| fail(StructuralError::MissingClaimId))?;
        let claim_amount = parse_amount(&self.claim_amount).map_err(fail)?;
        let service_date = parse_date("service_date", &self.service_date).map_err(fail)?;
        let submission_date = parse_date("submission_date", &self.submission_date).map_err(fail)?;
        let patient_dob = parse_date("patient_dob", &self.patient_dob).map_err(fail)?;

        Ok(ClaimRecord {
            reference: RecordRef {
                row: self.row,
                claim_id,
            },
            member_id: text(&self.member_id),
            provider_id: text(&self.provider_id),
            provider_npi: text(&self.provider_npi),
            cpt_code: text(&self.cpt_code),
            icd10_code: text(&self.icd10_code),
            claim_amount,
            service_date,
            submission_date,
            status: ClaimStatus::parse(text(&self.claim_status).as_deref()),
            denial_reason: text(&self.denial_reason),
            patient_dob,
            patient_zip: text(&self.patient_zip),
            patient_gender: text(&self.patient_gender),
        })
    }
}

fn text(cell: &Option<String>) -> Option<String> {
    cell.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_amount(cell: &Option<String>) -> Result<Option<f64>, StructuralError> {
    let Some(raw) = text(cell) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(StructuralError::MalformedAmount { value: raw }),
    }
}

fn parse_date(column: &str, cell: &Option<String>) -> Result<Option<NaiveDate>, StructuralError> {
    let Some(raw) = text(cell) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| StructuralError::MalformedDate {
            column: column.to_string(),
            value: raw,
        })
}

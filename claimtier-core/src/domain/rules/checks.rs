// claimtier-core/src/domain/rules/checks.rs

use chrono::NaiveDate;
use regex::Regex;

use super::rule::RuleId;
use crate::domain::claim::ClaimRecord;

/// One independent predicate over a single claim.
///
/// `check` returns the human-readable reason when the record violates the rule. It never
/// panics and never looks at any other rule's outcome. Absent inputs are the business of the
/// `Required*` rules, so every other rule passes when the field it inspects is missing.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;
    fn description(&self) -> String;
    fn check(&self, record: &ClaimRecord) -> Option<String>;
}

// --- REQUIRED FIELDS ---

pub struct RequiredField {
    id: RuleId,
    column: &'static str,
    present: fn(&ClaimRecord) -> bool,
}

impl RequiredField {
    pub fn member_id() -> Self {
        Self {
            id: RuleId::MissingMemberId,
            column: "member_id",
            present: |r| r.member_id.is_some(),
        }
    }

    pub fn provider_npi() -> Self {
        Self {
            id: RuleId::MissingNpi,
            column: "provider_npi",
            present: |r| r.provider_npi.is_some(),
        }
    }

    pub fn cpt_code() -> Self {
        Self {
            id: RuleId::MissingCpt,
            column: "cpt_code",
            present: |r| r.cpt_code.is_some(),
        }
    }

    pub fn icd10_code() -> Self {
        Self {
            id: RuleId::MissingDiagnosis,
            column: "icd10_code",
            present: |r| r.icd10_code.is_some(),
        }
    }

    pub fn claim_amount() -> Self {
        Self {
            id: RuleId::MissingAmount,
            column: "claim_amount",
            present: |r| r.claim_amount.is_some(),
        }
    }
}

impl Rule for RequiredField {
    fn id(&self) -> RuleId {
        self.id
    }

    fn description(&self) -> String {
        format!("{} must be present and non-empty", self.column)
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        (!(self.present)(record)).then(|| format!("{} is missing", self.column))
    }
}

// --- FORMATS ---

pub struct NpiFormat {
    pattern: Regex,
}

impl NpiFormat {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^[0-9]{10}$")?,
        })
    }
}

impl Rule for NpiFormat {
    fn id(&self) -> RuleId {
        RuleId::InvalidNpi
    }

    fn description(&self) -> String {
        "provider_npi must be exactly 10 digits".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let npi = record.provider_npi.as_deref()?;
        (!self.pattern.is_match(npi))
            .then(|| format!("provider_npi '{}' is not exactly 10 digits", npi))
    }
}

pub struct ZipFormat {
    pattern: Regex,
}

impl ZipFormat {
    pub fn new() -> Result<Self, regex::Error> {
        // ZIP, ZIP+4 written plain or hyphenated
        Ok(Self {
            pattern: Regex::new(r"^[0-9]{5}(-?[0-9]{4})?$")?,
        })
    }
}

impl Rule for ZipFormat {
    fn id(&self) -> RuleId {
        RuleId::InvalidZip
    }

    fn description(&self) -> String {
        "patient_zip, when present, must be 5 or 9 digits".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let zip = record.patient_zip.as_deref()?;
        (!self.pattern.is_match(zip)).then(|| format!("patient_zip '{}' is not 5 or 9 digits", zip))
    }
}

pub struct GenderCode;

impl GenderCode {
    const ALLOWED: [&'static str; 3] = ["M", "F", "U"];
}

impl Rule for GenderCode {
    fn id(&self) -> RuleId {
        RuleId::InvalidGender
    }

    fn description(&self) -> String {
        format!("patient_gender, when present, must be one of {:?}", Self::ALLOWED)
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let gender = record.patient_gender.as_deref()?;
        (!Self::ALLOWED.contains(&gender))
            .then(|| format!("patient_gender '{}' is not one of M, F, U", gender))
    }
}

// --- AMOUNTS ---

pub struct NonNegativeAmount;

impl Rule for NonNegativeAmount {
    fn id(&self) -> RuleId {
        RuleId::NegativeAmount
    }

    fn description(&self) -> String {
        "claim_amount must not be negative".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let amount = record.claim_amount?;
        (amount < 0.0).then(|| format!("claim_amount {:.2} is negative", amount))
    }
}

pub struct AmountUpperBound {
    max: f64,
}

impl AmountUpperBound {
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl Rule for AmountUpperBound {
    fn id(&self) -> RuleId {
        RuleId::ExcessiveAmount
    }

    fn description(&self) -> String {
        format!("claim_amount must not exceed {:.2}", self.max)
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let amount = record.claim_amount?;
        (amount > self.max)
            .then(|| format!("claim_amount {:.2} exceeds {:.2}", amount, self.max))
    }
}

// --- DATES ---

pub struct FutureServiceDate {
    as_of: NaiveDate,
}

impl FutureServiceDate {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }
}

impl Rule for FutureServiceDate {
    fn id(&self) -> RuleId {
        RuleId::FutureServiceDate
    }

    fn description(&self) -> String {
        "service_date must not be after the processing date".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let service = record.service_date?;
        (service > self.as_of).then(|| {
            format!(
                "service_date {} is after processing date {}",
                service, self.as_of
            )
        })
    }
}

pub struct SubmissionBeforeService;

impl Rule for SubmissionBeforeService {
    fn id(&self) -> RuleId {
        RuleId::SubmissionBeforeService
    }

    fn description(&self) -> String {
        "submission_date must not precede service_date".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let lag = record.submission_lag_days()?;
        (lag < 0).then(|| format!("submitted {} day(s) before service", -lag))
    }
}

pub struct LateSubmission {
    max_days: i64,
}

impl LateSubmission {
    pub fn new(max_days: i64) -> Self {
        Self { max_days }
    }
}

impl Rule for LateSubmission {
    fn id(&self) -> RuleId {
        RuleId::LateSubmission
    }

    fn description(&self) -> String {
        format!(
            "submission_date must be within {} days of service_date",
            self.max_days
        )
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        let lag = record.submission_lag_days()?;
        (lag > self.max_days).then(|| {
            format!(
                "submitted {} days after service (max {})",
                lag, self.max_days
            )
        })
    }
}

// --- STATUS ---

pub struct RecognizedStatus;

impl Rule for RecognizedStatus {
    fn id(&self) -> RuleId {
        RuleId::InvalidStatus
    }

    fn description(&self) -> String {
        "claim_status must be one of PAID, DENIED, PENDING".into()
    }

    fn check(&self, record: &ClaimRecord) -> Option<String> {
        (!record.status.is_recognized())
            .then(|| format!("claim_status '{}' is not recognized", record.status))
    }
}

// claimtier-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(claimtier::domain::configuration),
        help("Check the `thresholds` section of claimtier.yaml and the CLAIMTIER_* environment variables.")
    )]
    InvalidConfiguration(String),

    #[error("Batch '{batch}' is missing required column '{column}'")]
    #[diagnostic(
        code(claimtier::domain::schema),
        help("The input header must contain every required claim column.")
    )]
    MissingColumn { batch: String, column: String },

    #[error("Rule catalogue could not be built: {0}")]
    #[diagnostic(code(claimtier::domain::rules))]
    RuleDefinition(String),
}

// claimtier-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimTierError {
    // --- DOMAIN ERRORS (Configuration, Schema) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing, DuckDB) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl From<std::io::Error> for ClaimTierError {
    fn from(err: std::io::Error) -> Self {
        ClaimTierError::Infrastructure(InfrastructureError::Io(err))
    }
}

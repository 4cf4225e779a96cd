pub mod claim;
pub mod classification;
pub mod compliance;
pub mod error;
pub mod project;
pub mod rules;
pub mod summary;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;

// claimtier-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the excluded collaborators: claim storage, partition storage, metrics transport.
pub mod ports;

// 2. Domain (Business core)
// Claim records, rules, outlier statistics, tiering, batch summary.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB storage, config files, metrics file.
pub mod infrastructure;

// 4. Application (Use Cases)
// Batch validation and the pipeline driver.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use claimtier_core::ClaimTierError;
pub use error::ClaimTierError;

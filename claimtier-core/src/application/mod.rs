// claimtier-core/src/application/mod.rs

pub mod batch;
pub mod pipeline;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use claimtier_core::application::{run_pipeline, BatchValidator};`

pub use batch::{BatchOutcome, BatchValidator};
pub use pipeline::{RunResult, discover_batches, run_pipeline};

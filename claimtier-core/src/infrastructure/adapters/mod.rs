// claimtier-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod metrics;

pub use self::duckdb::DuckDbClaimStore;
pub use self::metrics::JsonLinesMetricsPublisher;

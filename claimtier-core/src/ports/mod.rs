// claimtier-core/src/ports/mod.rs

// Contracts with the collaborators this engine does not own. The domain never sees them;
// the application layer receives implementations by injection.

pub mod claim_source;
pub mod metrics;
pub mod partition_sink;

pub use claim_source::ClaimSource;
pub use metrics::MetricsPublisher;
pub use partition_sink::PartitionSink;

// claimtier-core/src/ports/metrics.rs

use async_trait::async_trait;

use crate::domain::summary::MetricDatum;
use crate::error::ClaimTierError;

#[async_trait]
pub trait MetricsPublisher: Send + Sync {
    async fn publish(&self, metrics: &[MetricDatum]) -> Result<(), ClaimTierError>;
}

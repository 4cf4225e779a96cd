// claimtier-core/src/infrastructure/adapters/metrics.rs

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use crate::domain::summary::{MetricDatum, MetricUnit};
use crate::error::ClaimTierError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::MetricsPublisher;

pub const METRICS_NAMESPACE: &str = "Healthcare/DataQuality";

#[derive(Serialize)]
struct MetricLine<'a> {
    namespace: &'a str,
    metric: &'a str,
    value: f64,
    unit: MetricUnit,
    source: &'a str,
    timestamp: String,
}

/// Appends one JSON object per metric to a local `.jsonl` file.
pub struct JsonLinesMetricsPublisher {
    path: PathBuf,
    // Serialises appends from concurrent publishers sharing this instance
    guard: Mutex<()>,
}

impl JsonLinesMetricsPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl MetricsPublisher for JsonLinesMetricsPublisher {
    async fn publish(&self, metrics: &[MetricDatum]) -> Result<(), ClaimTierError> {
        if metrics.is_empty() {
            return Ok(());
        }
        let timestamp = chrono::Utc::now().to_rfc3339();

        let mut buffer = String::new();
        for datum in metrics {
            let line = serde_json::to_string(&MetricLine {
                namespace: METRICS_NAMESPACE,
                metric: &datum.name,
                value: datum.value,
                unit: datum.unit,
                source: &datum.source,
                timestamp: timestamp.clone(),
            })
            .map_err(InfrastructureError::JsonError)?;
            info!(target: "METRICS_JSON", "{}", line);
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let _lock = self
            .guard
            .lock()
            .map_err(|_| InfrastructureError::LockPoisoned("metrics file".into()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buffer.as_bytes())?;
        Ok(())
    }
}

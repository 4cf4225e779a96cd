// claimtier-core/src/application/pipeline.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use walkdir::WalkDir;

use crate::application::batch::{BatchOutcome, BatchValidator};
use crate::domain::claim::BatchLineage;
use crate::domain::classification::Tier;
use crate::domain::project::ProjectConfig;
use crate::domain::summary::BatchSummary;
use crate::error::ClaimTierError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::{ClaimSource, MetricsPublisher, PartitionSink};

#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub batches: Vec<BatchSummary>,
    pub errors: Vec<String>,
}

/// A batch to process: its file and the label used in reports and metric dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub path: PathBuf,
    pub label: String,
}

impl BatchInput {
    /// Output directory name: the label with separators and extension flattened.
    pub fn output_dir_name(&self) -> String {
        let trimmed = self.label.strip_suffix(".csv").unwrap_or(&self.label);
        trimmed.replace(['/', '\\'], "__")
    }
}

/// Resolve `input` into batches: the file itself, or every `*.csv` below a directory
/// (sorted for a stable processing order).
pub fn discover_batches(input: &Path) -> Result<Vec<BatchInput>, InfrastructureError> {
    if !input.exists() {
        return Err(InfrastructureError::InputNotFound(
            input.display().to_string(),
        ));
    }

    if input.is_file() {
        let label = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());
        return Ok(vec![BatchInput {
            path: input.to_path_buf(),
            label,
        }]);
    }

    let mut batches = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            let label = path
                .strip_prefix(input)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            batches.push(BatchInput {
                path: path.to_path_buf(),
                label,
            });
        }
    }
    Ok(batches)
}

/// Runs every batch found under the input path.
///
/// Invalid thresholds abort before anything is read. A batch that cannot be loaded is
/// reported and the remaining batches still run.
#[instrument(skip_all, fields(project = %config.name))]
pub async fn run_pipeline<S, P, M>(
    source: &S,
    sink: &P,
    metrics: &M,
    project_dir: &Path,
    config: &ProjectConfig,
    input_override: Option<PathBuf>,
    as_of: NaiveDate,
) -> Result<RunResult, ClaimTierError>
where
    S: ClaimSource + ?Sized,
    P: PartitionSink + ?Sized,
    M: MetricsPublisher + ?Sized,
{
    // 1. CONFIGURATION (fatal)
    let validator = BatchValidator::new(&config.thresholds, as_of)?;
    info!(rules = validator.rules().len(), %as_of, "Rule set ready");

    // 2. DISCOVERY
    let input = input_override.unwrap_or_else(|| PathBuf::from(&config.input_path));
    let input = if input.is_absolute() {
        input
    } else {
        project_dir.join(input)
    };
    let batches = discover_batches(&input)?;
    if batches.is_empty() {
        warn!(input = %input.display(), "No CSV batch found");
    }

    let target_dir = project_dir.join(&config.target_path);
    std::fs::create_dir_all(&target_dir)?;

    // 3. ONE BATCH AT A TIME (no state crosses batches)
    let mut summaries = Vec::new();
    let mut errors = Vec::new();
    let mut claimed_dirs: HashMap<String, &str> = HashMap::new();
    for batch_input in &batches {
        // Two labels flattening to one directory would overwrite each other's partitions
        let dir_name = batch_input.output_dir_name();
        if let Some(owner) = claimed_dirs.get(&dir_name) {
            error!(batch = %batch_input.label, owner = %owner, "Output directory already taken");
            errors.push(format!(
                "{}: output directory '{}' already used by batch '{}'",
                batch_input.label, dir_name, owner
            ));
            continue;
        }
        claimed_dirs.insert(dir_name, &batch_input.label);

        match process_batch(source, sink, metrics, &validator, batch_input, &target_dir).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!(batch = %batch_input.label, error = %e, "Batch failed");
                errors.push(format!("{}: {}", batch_input.label, e));
            }
        }
    }

    Ok(RunResult {
        success: errors.is_empty(),
        batches: summaries,
        errors,
    })
}

#[instrument(
    skip(source, sink, metrics, validator, target_dir),
    fields(batch = %batch_input.label)
)]
async fn process_batch<S, P, M>(
    source: &S,
    sink: &P,
    metrics: &M,
    validator: &BatchValidator,
    batch_input: &BatchInput,
    target_dir: &Path,
) -> Result<BatchSummary, ClaimTierError>
where
    S: ClaimSource + ?Sized,
    P: PartitionSink + ?Sized,
    M: MetricsPublisher + ?Sized,
{
    let mut raw = source.load_batch(&batch_input.path).await?;
    raw.name = batch_input.label.clone();

    let outcome = validator.run(&raw);

    let batch_dir = target_dir.join(batch_input.output_dir_name());
    std::fs::create_dir_all(&batch_dir)?;
    let lineage = BatchLineage::now(&batch_input.label);
    write_outcome(sink, &outcome, &lineage, &batch_dir).await?;

    metrics.publish(&outcome.summary.metrics()).await?;
    Ok(outcome.summary)
}

async fn write_outcome<P>(
    sink: &P,
    outcome: &BatchOutcome,
    lineage: &BatchLineage,
    batch_dir: &Path,
) -> Result<(), ClaimTierError>
where
    P: PartitionSink + ?Sized,
{
    for tier in Tier::ALL {
        sink.write_partition(tier, outcome.partition(tier), lineage, batch_dir)
            .await?;
    }
    sink.write_structural_failures(&outcome.structural_failures, batch_dir)
        .await?;

    let summary_json = serde_json::to_string_pretty(&outcome.summary)
        .map_err(InfrastructureError::JsonError)?;
    atomic_write(batch_dir.join("summary.json"), summary_json)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::claim::raw::RawBatch;
    use crate::domain::claim::{RawClaimRow, StructuralFailure};
    use crate::domain::classification::ClassifiedClaim;
    use crate::domain::compliance::ValidationThresholds;
    use crate::domain::summary::MetricDatum;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // --- MOCK ADAPTERS ---
    struct MockSource;

    #[async_trait]
    impl ClaimSource for MockSource {
        async fn load_batch(&self, path: &Path) -> Result<RawBatch, ClaimTierError> {
            if path.to_string_lossy().contains("unreadable") {
                return Err(InfrastructureError::InputNotFound(path.display().to_string()).into());
            }
            let rows = (0..3)
                .map(|i| RawClaimRow {
                    row: i,
                    claim_id: Some(format!("CLM{}", i)),
                    member_id: Some("MBR".into()),
                    provider_npi: Some("1234567890".into()),
                    cpt_code: Some("99213".into()),
                    icd10_code: Some("E11.9".into()),
                    claim_amount: Some(if i == 2 { "-5".into() } else { "100".into() }),
                    service_date: Some("2024-01-01".into()),
                    submission_date: Some("2024-01-05".into()),
                    claim_status: Some("PAID".into()),
                    ..Default::default()
                })
                .collect();
            Ok(RawBatch {
                name: String::new(),
                rows,
                rejected: vec![],
            })
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        partitions: Arc<Mutex<Vec<(Tier, usize)>>>,
    }

    #[async_trait]
    impl PartitionSink for RecordingSink {
        async fn write_partition(
            &self,
            tier: Tier,
            claims: &[ClassifiedClaim],
            _lineage: &BatchLineage,
            _batch_dir: &Path,
        ) -> Result<(), ClaimTierError> {
            self.partitions.lock().unwrap().push((tier, claims.len()));
            Ok(())
        }

        async fn write_structural_failures(
            &self,
            _failures: &[StructuralFailure],
            _batch_dir: &Path,
        ) -> Result<(), ClaimTierError> {
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct RecordingMetrics {
        published: Arc<Mutex<Vec<MetricDatum>>>,
    }

    #[async_trait]
    impl MetricsPublisher for RecordingMetrics {
        async fn publish(&self, metrics: &[MetricDatum]) -> Result<(), ClaimTierError> {
            self.published.lock().unwrap().extend_from_slice(metrics);
            Ok(())
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_over_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("raw_data");
        std::fs::create_dir_all(input.join("claims"))?;
        std::fs::write(input.join("claims/a.csv"), "")?;
        std::fs::write(input.join("b.csv"), "")?;
        std::fs::write(input.join("notes.txt"), "")?;

        let sink = RecordingSink::default();
        let metrics = RecordingMetrics::default();
        let config = ProjectConfig::default();

        let result = run_pipeline(&MockSource, &sink, &metrics, dir.path(), &config, None, as_of())
            .await?;

        assert!(result.success);
        assert_eq!(result.batches.len(), 2);
        let labels: Vec<&str> = result.batches.iter().map(|b| b.batch.as_str()).collect();
        assert_eq!(labels, vec!["b.csv", "claims/a.csv"]);
        assert_eq!(result.batches[0].gold_records, 2);
        assert_eq!(result.batches[0].silver_records, 1);

        assert!(dir.path().join("target/claims__a/summary.json").exists());
        assert_eq!(sink.partitions.lock().unwrap().len(), 6);
        let published = metrics.published.lock().unwrap();
        assert!(published.iter().any(|m| m.name == "DataQualityScore" && m.source == "b.csv"));
        // b.csv: 8 metrics; claims/a.csv: 8 per file plus 8 under "claims/"
        assert_eq!(published.len(), 24);
        assert!(published.iter().any(|m| m.name == "GoldRecords" && m.source == "claims/"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_batch_is_reported() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("raw_data"))?;
        std::fs::write(dir.path().join("raw_data/good.csv"), "")?;
        std::fs::write(dir.path().join("raw_data/unreadable.csv"), "")?;

        let result = run_pipeline(
            &MockSource,
            &RecordingSink::default(),
            &RecordingMetrics::default(),
            dir.path(),
            &ProjectConfig::default(),
            None,
            as_of(),
        )
        .await?;

        assert!(!result.success);
        assert_eq!(result.batches.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("unreadable.csv"));
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_thresholds_abort_before_reading() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ProjectConfig {
            thresholds: ValidationThresholds {
                max_claim_amount: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let metrics = RecordingMetrics::default();

        // raw_data does not even exist: the configuration error must win
        let result = run_pipeline(
            &MockSource,
            &RecordingSink::default(),
            &metrics,
            dir.path(),
            &config,
            None,
            as_of(),
        )
        .await;

        assert!(matches!(result, Err(ClaimTierError::Domain(_))));
        assert!(metrics.published.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_colliding_output_dirs_fail_the_second_batch() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("raw_data");
        std::fs::create_dir_all(input.join("claims"))?;
        std::fs::write(input.join("claims/a.csv"), "")?;
        std::fs::write(input.join("claims__a.csv"), "")?;

        let sink = RecordingSink::default();
        let result = run_pipeline(
            &MockSource,
            &sink,
            &RecordingMetrics::default(),
            dir.path(),
            &ProjectConfig::default(),
            None,
            as_of(),
        )
        .await?;

        assert!(!result.success);
        assert_eq!(result.batches.len(), 1);
        assert_eq!(result.batches[0].batch, "claims/a.csv");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("claims__a.csv"));
        assert!(result.errors[0].contains("already used by batch 'claims/a.csv'"));
        // only the first batch reached the sink
        assert_eq!(sink.partitions.lock().unwrap().len(), 3);
        Ok(())
    }

    #[test]
    fn test_missing_input() {
        let result = discover_batches(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(InfrastructureError::InputNotFound(_))));
    }

    #[test]
    fn test_output_dir_name() {
        let input = BatchInput {
            path: PathBuf::from("x"),
            label: "claims/2024/jan.csv".into(),
        };
        assert_eq!(input.output_dir_name(), "claims__2024__jan");
    }
}

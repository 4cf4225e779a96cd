// claimtier/src/commands/run.rs
//
// USE CASE: Validate and tier every batch of the project.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use claimtier_core::application::run_pipeline;
use claimtier_core::infrastructure::adapters::{DuckDbClaimStore, JsonLinesMetricsPublisher};
use claimtier_core::infrastructure::config::load_project_config;
use comfy_table::Table;

pub async fn execute(
    project_dir: PathBuf,
    input: Option<PathBuf>,
    as_of: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    println!("   Processing date: {}", as_of);

    // B. Instantiate the Adapters
    let store = DuckDbClaimStore::in_memory().context("Failed to initialize DuckDB")?;
    let metrics_path = project_dir
        .join(&config.target_path)
        .join(&config.metrics_file);
    let metrics = JsonLinesMetricsPublisher::new(metrics_path);

    // C. Run the Pipeline (Application Layer)
    let result =
        run_pipeline(&store, &store, &metrics, &project_dir, &config, input, as_of).await;

    match result {
        Ok(run_res) => {
            let mut table = Table::new();
            table.set_header(vec![
                "Batch",
                "Total",
                "Gold",
                "Silver",
                "Quarantine",
                "Structural",
                "Quality %",
            ]);
            for summary in &run_res.batches {
                table.add_row(vec![
                    summary.batch.clone(),
                    summary.total_records.to_string(),
                    summary.gold_records.to_string(),
                    summary.silver_records.to_string(),
                    summary.quarantine_records.to_string(),
                    summary.structural_failures.to_string(),
                    format!("{:.2}", summary.data_quality_score),
                ]);
            }
            if !run_res.batches.is_empty() {
                println!("{table}");
            }

            if run_res.success {
                println!(
                    "\n✨ SUCCESS! {} batch(es) tiered in {:.2?}",
                    run_res.batches.len(),
                    start.elapsed()
                );
            } else {
                for error in &run_res.errors {
                    eprintln!("   ❌ {}", error);
                }
                eprintln!("\n❌ FAILURE. {} batch(es) failed.", run_res.errors.len());
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

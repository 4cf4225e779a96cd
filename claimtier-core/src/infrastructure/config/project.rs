// claimtier-core/src/infrastructure/config/project.rs

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["claimtier_project_conf.yaml", "claimtier.yaml"];

/// Loads `claimtier.yaml` from the project directory, falling back to defaults when there is
/// none, then layers `CLAIMTIER_*` environment overrides on top.
///
/// Thresholds are not validated here: that is the validator's job at run start, so a bad
/// value is reported as a configuration error of the run.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config: ProjectConfig = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading project configuration");
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read project config at {:?}", config_path))?;
            serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse project config YAML at {:?}", config_path)
            })?
        }
        None => {
            info!(dir = ?project_dir, "No configuration file, using defaults");
            ProjectConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|filename| root.join(filename))
        .find(|p| p.exists())
}

/// `lookup` is injected so tests do not have to mutate the process environment.
fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("CLAIMTIER_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("CLAIMTIER_MAX_CLAIM_AMOUNT") {
        config.thresholds.max_claim_amount = val.trim().parse().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "CLAIMTIER_MAX_CLAIM_AMOUNT is not a number: '{}'",
                val
            ))
        })?;
        info!(value = config.thresholds.max_claim_amount, "Overriding max claim amount via ENV");
    }
    if let Some(val) = lookup("CLAIMTIER_MAX_SUBMISSION_LAG_DAYS") {
        config.thresholds.max_submission_lag_days = val.trim().parse().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "CLAIMTIER_MAX_SUBMISSION_LAG_DAYS is not an integer: '{}'",
                val
            ))
        })?;
        info!(
            value = config.thresholds.max_submission_lag_days,
            "Overriding submission lag via ENV"
        );
    }
    Ok(())
}

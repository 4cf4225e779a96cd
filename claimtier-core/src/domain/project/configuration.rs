// claimtier-core/src/domain/project/configuration.rs

use crate::domain::compliance::ValidationThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    /// File or directory of CSV batches, relative to the project directory.
    #[serde(rename = "input-path", default = "default_input_path")]
    pub input_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    /// JSON-lines file (under target-path) receiving one metric per line.
    #[serde(rename = "metrics-file", default = "default_metrics_file")]
    pub metrics_file: String,

    #[serde(default)]
    pub thresholds: ValidationThresholds,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            input_path: default_input_path(),
            target_path: default_target_path(),
            metrics_file: default_metrics_file(),
            thresholds: ValidationThresholds::default(),
        }
    }
}

fn default_name() -> String {
    "claimtier".to_string()
}
fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_input_path() -> String {
    "raw_data".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_metrics_file() -> String {
    "metrics.jsonl".to_string()
}

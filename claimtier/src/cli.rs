// claimtier/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claimtier")]
#[command(about = "Healthcare claims validation and Gold/Silver/Quarantine tiering", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Validates and tiers every claims batch of the project
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// CSV file or directory to process instead of the configured input-path
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Processing date used by the date rules (YYYY-MM-DD, default: today)
        #[arg(long, env = "CLAIMTIER_AS_OF")]
        as_of: Option<NaiveDate>,
    },

    /// 📜 Lists the validation rule catalogue
    Rules,

    /// 🔍 Inspects a tier output (schema + sample rows)
    Inspect {
        /// Parquet file or partition directory (ex: target/claims/gold)
        #[arg(long, short)]
        file: PathBuf,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

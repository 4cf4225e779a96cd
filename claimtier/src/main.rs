// claimtier/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug claimtier run ... for per-batch details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_dir,
            input,
            as_of,
        } => commands::run::execute(project_dir, input, as_of).await,
        Commands::Rules => commands::rules::execute(),
        Commands::Inspect { file, limit } => commands::inspect::execute(file, limit),
    }
}

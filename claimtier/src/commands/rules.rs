// claimtier/src/commands/rules.rs
//
// USE CASE: Print the rule catalogue with the thresholds in effect.

use anyhow::Context;
use comfy_table::Table;
use std::path::Path;

use claimtier_core::domain::rules::{Rule, RuleSet};
use claimtier_core::infrastructure::config::load_project_config;

pub fn execute() -> anyhow::Result<()> {
    let config = load_project_config(Path::new("."))
        .context("Failed to load project configuration from current directory")?;
    let rule_set = RuleSet::standard(&config.thresholds, chrono::Local::now().date_naive())?;

    let mut table = Table::new();
    table.set_header(vec!["Rule", "Category", "Check"]);
    for rule in rule_set.rules() {
        let id = rule.id();
        table.add_row(vec![
            id.as_str().to_string(),
            id.category().as_str().to_string(),
            rule.description(),
        ]);
    }

    println!("📜 {} rules (a claim failing any of them goes to SILVER)", rule_set.len());
    println!("{table}");
    Ok(())
}

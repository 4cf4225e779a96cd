// claimtier/src/commands/inspect.rs
//
// USE CASE: Inspect a tier output (schema + sample rows).

use comfy_table::Table;
use std::path::PathBuf;

use claimtier_core::infrastructure::adapters::DuckDbClaimStore;

pub fn execute(file: PathBuf, limit: usize) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!(
            "❌ Output not found at: {}\n👉 Have you run 'claimtier run'?",
            file.display()
        );
    }

    let store = DuckDbClaimStore::in_memory()?;
    let total = store.count_rows(&file)?;
    let (columns, rows) = store.sample_rows(&file, limit)?;

    println!("\n🔍 Inspecting: '{}' ({} rows)", file.display(), total);

    let mut table = Table::new();
    table.set_header(columns);
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");

    Ok(())
}

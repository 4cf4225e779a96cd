use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const HEADER: &str = "claim_id,member_id,provider_id,provider_npi,cpt_code,icd10_code,claim_amount,service_date,submission_date,claim_status,denial_reason,patient_dob,patient_zip,patient_gender";

/// Throwaway project: a config file and a raw_data/ folder of CSV batches.
struct ClaimTierTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl ClaimTierTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("project");
        std::fs::create_dir_all(root.join("raw_data"))?;
        std::fs::write(
            root.join("claimtier.yaml"),
            "name: claims_test\nversion: \"1.0.0\"\nthresholds:\n  max_claim_amount: 50000\n",
        )?;
        Ok(Self { _tmp: tmp, root })
    }

    fn write_batch(&self, name: &str, lines: &[String]) -> Result<()> {
        let mut content = String::from(HEADER);
        for line in lines {
            content.push('\n');
            content.push_str(line);
        }
        content.push('\n');
        std::fs::write(self.root.join("raw_data").join(name), content)?;
        Ok(())
    }

    fn claimtier(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("claimtier"));
        cmd.current_dir(&self.root);
        cmd.env_remove("CLAIMTIER_TARGET_PATH");
        cmd.env_remove("CLAIMTIER_MAX_CLAIM_AMOUNT");
        cmd.env_remove("CLAIMTIER_MAX_SUBMISSION_LAG_DAYS");
        cmd
    }

    fn summary(&self, batch_dir: &str) -> Result<serde_json::Value> {
        let path = self.root.join("target").join(batch_dir).join("summary.json");
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("summary not found at {}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn claim(i: usize, amount: &str, npi: &str) -> String {
    format!(
        "CLM{i:05},MBR{i},PRV1,{npi},99213,E11.9,{amount},2024-03-01,2024-03-10,PAID,,1980-02-02,30301,F"
    )
}

/// 40 claims around 150, one far outlier, two rule failures, one malformed amount.
fn mixed_batch() -> Vec<String> {
    let mut lines: Vec<String> = (0..40)
        .map(|i| claim(i, &format!("{}", 145 + (i % 11)), "1234567890"))
        .collect();
    lines.push(claim(40, "9000", "1234567890"));
    lines.push(claim(41, "150", "12345"));
    lines.push(claim(42, "-20", "1234567890"));
    lines.push(claim(43, "abc", "1234567890"));
    lines
}

fn count_parquet(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|e| {
            let path = e.path();
            if path.is_dir() {
                count_parquet(&path)
            } else {
                usize::from(path.extension().is_some_and(|x| x == "parquet"))
            }
        })
        .sum()
}

#[test]
fn test_run_tiers_mixed_batch() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.write_batch("claims.csv", &mixed_batch())?;

    env.claimtier()
        .args(["run", "--as-of", "2024-06-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    let summary = env.summary("claims")?;
    assert_eq!(summary["total_records"], 44);
    assert_eq!(summary["gold_records"], 40);
    assert_eq!(summary["silver_records"], 2);
    assert_eq!(summary["quarantine_records"], 1);
    assert_eq!(summary["structural_failures"], 1);

    let batch_dir = env.root.join("target/claims");
    assert!(count_parquet(&batch_dir.join("gold")) > 0);
    assert!(batch_dir.join("gold/year=2024/month=3").is_dir());
    assert_eq!(count_parquet(&batch_dir.join("silver")), 1);
    assert_eq!(count_parquet(&batch_dir.join("quarantine")), 1);

    let failures_json = std::fs::read_to_string(batch_dir.join("structural_failures.json"))?;
    let failures: serde_json::Value = serde_json::from_str(&failures_json)?;
    assert_eq!(failures.as_array().map(Vec::len), Some(1));
    assert_eq!(failures[0]["claim_id"], "CLM00043");

    let metrics = std::fs::read_to_string(env.root.join("target/metrics.jsonl"))?;
    assert_eq!(metrics.lines().count(), 8);
    assert!(metrics.contains("\"DataQualityScore\""));
    Ok(())
}

#[test]
fn test_ragged_line_does_not_abort_batch() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    let mut lines = mixed_batch();
    lines.insert(10, "CLM99999,MBR99,1234567890".to_string());
    env.write_batch("claims.csv", &lines)?;

    env.claimtier()
        .args(["run", "--as-of", "2024-06-30"])
        .assert()
        .success();

    let summary = env.summary("claims")?;
    assert_eq!(summary["total_records"], 45);
    assert_eq!(summary["structural_failures"], 2);
    assert_eq!(summary["gold_records"], 40);
    assert_eq!(summary["silver_records"], 2);
    assert_eq!(summary["quarantine_records"], 1);
    Ok(())
}

#[test]
fn test_folder_batches_publish_prefix_metrics() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    std::fs::create_dir_all(env.root.join("raw_data/claims"))?;
    env.write_batch("claims/jan.csv", &mixed_batch())?;

    env.claimtier()
        .args(["run", "--as-of", "2024-06-30"])
        .assert()
        .success();

    assert_eq!(env.summary("claims__jan")?["gold_records"], 40);
    let metrics = std::fs::read_to_string(env.root.join("target/metrics.jsonl"))?;
    assert_eq!(metrics.lines().count(), 16);
    assert!(metrics.contains("\"source\":\"claims/\""));
    Ok(())
}

#[test]
fn test_rerun_gives_same_summary() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.write_batch("claims.csv", &mixed_batch())?;

    env.claimtier().args(["run", "--as-of", "2024-06-30"]).assert().success();
    let first = env.summary("claims")?;
    env.claimtier().args(["run", "--as-of", "2024-06-30"]).assert().success();
    let second = env.summary("claims")?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_bad_batch_fails_run_but_others_are_written() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.write_batch("a_good.csv", &mixed_batch())?;
    std::fs::write(
        env.root.join("raw_data/b_broken.csv"),
        "claim_id,member_id\nCLM1,MBR1\n",
    )?;

    env.claimtier()
        .args(["run", "--as-of", "2024-06-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("b_broken.csv"));

    assert_eq!(env.summary("a_good")?["gold_records"], 40);
    Ok(())
}

#[test]
fn test_invalid_threshold_env_is_fatal() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.write_batch("claims.csv", &mixed_batch())?;

    env.claimtier()
        .args(["run", "--as-of", "2024-06-30"])
        .env("CLAIMTIER_MAX_CLAIM_AMOUNT", "-1")
        .assert()
        .failure();

    assert!(!env.root.join("target/claims").exists());
    Ok(())
}

#[test]
fn test_rules_lists_catalogue() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.claimtier()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("MISSING_NPI"))
        .stdout(predicate::str::contains("LATE_SUBMISSION"))
        .stdout(predicate::str::contains("14 rules"));
    Ok(())
}

#[test]
fn test_inspect_shows_silver_rows() -> Result<()> {
    let env = ClaimTierTestEnv::new()?;
    env.write_batch("claims.csv", &mixed_batch())?;
    env.claimtier().args(["run", "--as-of", "2024-06-30"]).assert().success();

    env.claimtier()
        .args(["inspect", "--file", "target/claims/silver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 rows)"))
        .stdout(predicate::str::contains("dq_issues"));
    Ok(())
}

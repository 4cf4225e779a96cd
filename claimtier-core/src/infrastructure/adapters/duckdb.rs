// claimtier-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::domain::claim::raw::{OPTIONAL_COLUMNS, RawBatch, REQUIRED_COLUMNS};
use crate::domain::claim::{BatchLineage, RawClaimRow, StructuralError, StructuralFailure};
use crate::domain::classification::{ClassifiedClaim, Tier};
use crate::domain::error::DomainError;
use crate::error::ClaimTierError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::{ClaimSource, PartitionSink};

const BUFFER_TABLE: &str = "claimtier_partition_buf";

const BUFFER_DDL: &str = "CREATE OR REPLACE TEMP TABLE claimtier_partition_buf (
    claim_id VARCHAR, member_id VARCHAR, provider_id VARCHAR, provider_npi VARCHAR,
    cpt_code VARCHAR, icd10_code VARCHAR, claim_amount DOUBLE,
    service_date VARCHAR, submission_date VARCHAR, claim_status VARCHAR, denial_reason VARCHAR,
    patient_dob VARCHAR, patient_zip VARCHAR, patient_gender VARCHAR,
    dq_issues VARCHAR, z_score DOUBLE, avg_amount DOUBLE, stddev_amount DOUBLE,
    anomaly_details VARCHAR
)";

const CLAIM_COLUMNS: &str = "claim_id, member_id, provider_id, provider_npi, cpt_code, icd10_code, \
     claim_amount, CAST(service_date AS DATE) AS service_date, \
     CAST(submission_date AS DATE) AS submission_date, claim_status, denial_reason, \
     CAST(patient_dob AS DATE) AS patient_dob, patient_zip, patient_gender";

/// Local stand-in for the claims bucket: reads CSV batches and writes Parquet partitions.
pub struct DuckDbClaimStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbClaimStore {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::LockPoisoned("DuckDB connection".into()))
    }

    /// Row count of a Parquet file, directory or glob (hive partitions included).
    pub fn count_rows(&self, parquet: &Path) -> Result<u64, InfrastructureError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT count(*) FROM read_parquet({}, hive_partitioning = true)",
            parquet_glob(parquet)
        );
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// First `limit` rows of a Parquet file or partition directory, rendered as text.
    pub fn sample_rows(
        &self,
        parquet: &Path,
        limit: usize,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), InfrastructureError> {
        let conn = self.lock()?;
        let source = format!(
            "read_parquet({}, hive_partitioning = true)",
            parquet_glob(parquet)
        );

        let columns = Self::read_header(&conn, &source)?;

        let projection: Vec<String> = columns
            .iter()
            .map(|c| format!("CAST(\"{c}\" AS VARCHAR)"))
            .collect();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} LIMIT {}",
            projection.join(", "),
            source,
            limit
        ))?;
        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let rendered = (0..columns.len())
                .map(|i| {
                    row.get::<_, Option<String>>(i)
                        .map(|v| v.unwrap_or_else(|| "NULL".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            values.push(rendered);
        }
        Ok((columns, values))
    }

    fn read_header(conn: &Connection, source: &str) -> Result<Vec<String>, InfrastructureError> {
        let mut stmt = conn.prepare(&format!("DESCRIBE SELECT * FROM {}", source))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn read_rejects(conn: &Connection) -> Result<Vec<(u64, String)>, InfrastructureError> {
        let mut stmt = conn.prepare(
            "SELECT line, min(error_message) FROM reject_errors GROUP BY line ORDER BY line",
        )?;
        let rejects = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?.max(0) as u64, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rejects)
    }
}

#[async_trait]
impl ClaimSource for DuckDbClaimStore {
    #[instrument(skip(self))]
    async fn load_batch(&self, path: &Path) -> Result<RawBatch, ClaimTierError> {
        if !path.is_file() {
            return Err(InfrastructureError::InputNotFound(path.display().to_string()).into());
        }
        let name = path.display().to_string();
        let conn = self.lock()?;

        // 1. Header check: a missing required column makes the whole batch unreadable.
        // The dialect is pinned so a ragged line cannot make the sniffer fall back to one column.
        let probe = format!(
            "read_csv({}, header = true, delim = ',', all_varchar = true, ignore_errors = true)",
            sql_literal(&name)
        );
        let header = Self::read_header(&conn, &probe)?;
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|c| !header.iter().any(|h| h == *c))
        {
            return Err(DomainError::MissingColumn {
                batch: name,
                column: missing.to_string(),
            }
            .into());
        }

        // 2. Projection in the fixed RawClaimRow order; absent optional columns read as NULL
        let projection: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .chain(OPTIONAL_COLUMNS.iter())
            .map(|c| {
                if header.iter().any(|h| h == c) {
                    format!("\"{}\"", c)
                } else {
                    format!("NULL AS {}", c)
                }
            })
            .collect();

        conn.execute_batch("DROP TABLE IF EXISTS reject_errors; DROP TABLE IF EXISTS reject_scans;")
            .map_err(InfrastructureError::from)?;

        let sql = format!(
            "SELECT {} FROM read_csv({}, header = true, delim = ',', all_varchar = true, \
             store_rejects = true)",
            projection.join(", "),
            sql_literal(&name)
        );
        let mut stmt = conn.prepare(&sql).map_err(InfrastructureError::from)?;
        let mut rows = stmt
            .query_map([], |row| {
                Ok(RawClaimRow {
                    row: 0,
                    claim_id: row.get(0)?,
                    member_id: row.get(1)?,
                    provider_npi: row.get(2)?,
                    cpt_code: row.get(3)?,
                    icd10_code: row.get(4)?,
                    claim_amount: row.get(5)?,
                    service_date: row.get(6)?,
                    submission_date: row.get(7)?,
                    claim_status: row.get(8)?,
                    provider_id: row.get(9)?,
                    denial_reason: row.get(10)?,
                    patient_dob: row.get(11)?,
                    patient_zip: row.get(12)?,
                    patient_gender: row.get(13)?,
                })
            })
            .map_err(InfrastructureError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(InfrastructureError::from)?;
        rows.iter_mut().enumerate().for_each(|(i, r)| r.row = i);

        // 3. Lines the reader could not split are structural failures, numbered after the rows
        let rejected: Vec<StructuralFailure> = Self::read_rejects(&conn)?
            .into_iter()
            .enumerate()
            .map(|(k, (line, message))| StructuralFailure {
                row: rows.len() + k,
                claim_id: None,
                error: StructuralError::RejectedLine {
                    reason: format!("line {}: {}", line, message),
                },
            })
            .collect();

        info!(rows = rows.len(), rejected = rejected.len(), "Batch loaded");
        Ok(RawBatch {
            name,
            rows,
            rejected,
        })
    }
}

#[async_trait]
impl PartitionSink for DuckDbClaimStore {
    #[instrument(skip(self, claims), fields(rows = claims.len()))]
    async fn write_partition(
        &self,
        tier: Tier,
        claims: &[ClassifiedClaim],
        lineage: &BatchLineage,
        batch_dir: &Path,
    ) -> Result<(), ClaimTierError> {
        let out_dir = batch_dir.join(tier.partition_name());
        if out_dir.exists() {
            std::fs::remove_dir_all(&out_dir)?;
        }
        if claims.is_empty() {
            debug!(%tier, "Empty partition, nothing written");
            return Ok(());
        }

        let mut conn = self.lock()?;
        conn.execute_batch(BUFFER_DDL)
            .map_err(InfrastructureError::from)?;

        let tx = conn.transaction().map_err(InfrastructureError::from)?;
        {
            let mut insert = tx
                .prepare(&format!(
                    "INSERT INTO {} VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    BUFFER_TABLE
                ))
                .map_err(InfrastructureError::from)?;
            for claim in claims {
                let r = &claim.record;
                let status = Some(r.status.as_str()).filter(|s| !s.is_empty());
                let dq_issues = Some(claim.dq_issues()).filter(|s| !s.is_empty());
                insert
                    .execute(params![
                        r.claim_id(),
                        r.member_id,
                        r.provider_id,
                        r.provider_npi,
                        r.cpt_code,
                        r.icd10_code,
                        r.claim_amount,
                        r.service_date.map(|d| d.to_string()),
                        r.submission_date.map(|d| d.to_string()),
                        status,
                        r.denial_reason,
                        r.patient_dob.map(|d| d.to_string()),
                        r.patient_zip,
                        r.patient_gender,
                        dq_issues,
                        claim.outlier.z_score,
                        claim.group.as_ref().map(|g| g.mean),
                        claim.group.as_ref().and_then(|g| g.stddev),
                        claim.anomaly_details(),
                    ])
                    .map_err(InfrastructureError::from)?;
            }
        }
        tx.commit().map_err(InfrastructureError::from)?;

        let lineage_cols = format!(
            "CAST({} AS TIMESTAMP) AS ingestion_timestamp, {} AS source_file",
            sql_literal(
                &lineage
                    .ingestion_timestamp
                    .format("%Y-%m-%d %H:%M:%S%.6f")
                    .to_string()
            ),
            sql_literal(&lineage.source_file)
        );

        let copy = match tier {
            Tier::Gold => format!(
                "COPY (SELECT {cols}, {lineage}, year(CAST(service_date AS DATE)) AS year, \
                 month(CAST(service_date AS DATE)) AS month FROM {buf}) \
                 TO {dest} (FORMAT parquet, PARTITION_BY (year, month))",
                cols = CLAIM_COLUMNS,
                lineage = lineage_cols,
                buf = BUFFER_TABLE,
                dest = sql_literal(&out_dir.display().to_string()),
            ),
            Tier::Silver => {
                std::fs::create_dir_all(&out_dir)?;
                format!(
                    "COPY (SELECT {cols}, {lineage}, dq_issues FROM {buf}) \
                     TO {dest} (FORMAT parquet)",
                    cols = CLAIM_COLUMNS,
                    lineage = lineage_cols,
                    buf = BUFFER_TABLE,
                    dest = sql_literal(&out_dir.join("part-0.parquet").display().to_string()),
                )
            }
            Tier::Quarantine => {
                std::fs::create_dir_all(&out_dir)?;
                format!(
                    "COPY (SELECT {cols}, {lineage}, z_score, avg_amount, stddev_amount, \
                     'STATISTICAL_OUTLIER' AS anomaly_type, anomaly_details FROM {buf}) \
                     TO {dest} (FORMAT parquet)",
                    cols = CLAIM_COLUMNS,
                    lineage = lineage_cols,
                    buf = BUFFER_TABLE,
                    dest = sql_literal(&out_dir.join("part-0.parquet").display().to_string()),
                )
            }
        };
        conn.execute_batch(&copy).map_err(InfrastructureError::from)?;
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", BUFFER_TABLE))
            .map_err(InfrastructureError::from)?;

        info!(%tier, rows = claims.len(), dir = %out_dir.display(), "Partition written");
        Ok(())
    }

    async fn write_structural_failures(
        &self,
        failures: &[StructuralFailure],
        batch_dir: &Path,
    ) -> Result<(), ClaimTierError> {
        let json = serde_json::to_string_pretty(failures).map_err(InfrastructureError::from)?;
        atomic_write(batch_dir.join("structural_failures.json"), json)?;
        Ok(())
    }
}

/// Single-quoted SQL string literal.
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn parquet_glob(path: &Path) -> String {
    if path.is_dir() {
        sql_literal(&path.join("**").join("*.parquet").display().to_string())
    } else {
        sql_literal(&path.display().to_string())
    }
}

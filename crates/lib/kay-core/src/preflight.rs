//! Operator checklist run before handing a connection string to a user.
//!
//! Each step isolates its own failure and prints a marked line. Only the
//! connectivity step aborts the run.

use std::{error::Error, fmt, io::Write};

use chrono::{DateTime, FixedOffset};
use kay_store::Row;
use kay_store::schema::{EMBEDDING_DIMENSIONS, READ_PROBES, TABLE_WRITE_PROBE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::QueryEntity;
use crate::store::{KayStore, StoreError};

/// Connectivity statement; also reports the server's identity.
pub const CONNECTION_SQL: &str =
    "SELECT NOW() AS time, current_database() AS db, current_user AS db_user";

/// Scratch-table write a read-only role must refuse.
pub const WRITE_PROBE_CREATE_SQL: &str = "CREATE TABLE test_write_check (id int)";
const WRITE_PROBE_DROP_SQL: &str = "DROP TABLE IF EXISTS test_write_check";

const EMBEDDED_CHUNKS_SQL: &str =
    "SELECT COUNT(*) AS count FROM file_chunks WHERE embedding IS NOT NULL";

const VECTOR_PROBE_SQL: &str = r"
SELECT
  f.filename,
  c.chunk_text,
  c.embedding <=> array_fill(0::real, ARRAY[1536])::vector AS distance
FROM file_chunks c
JOIN files f ON c.file_id = f.id
WHERE f.folder LIKE '%pai-documentation%'
  AND c.embedding IS NOT NULL
ORDER BY distance ASC
LIMIT 3";

const PASS: &str = "✅";
const FAIL: &str = "❌";
const WARN: &str = "⚠️ ";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug)]
pub enum PreflightError {
    Connection(StoreError),
    Io(std::io::Error),
}

impl fmt::Display for PreflightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for PreflightError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PreflightError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Identity reported by the server during the connectivity step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub database: String,
    pub user: String,
    pub time: String,
}

/// Outcome of trying to create a scratch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteProbe {
    /// The role refused the write, as a read-only role should.
    Denied { reason: String },
    /// The write succeeded; `dropped` says whether the scratch table was removed.
    Allowed { dropped: bool },
    /// The write failed for some other reason, so the role's privileges are unknown.
    Inconclusive { reason: String },
}

/// Per-table row count result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCheck {
    pub table: &'static str,
    pub rows: Result<i64, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    pub connection: ConnectionInfo,
    pub tables: Vec<TableCheck>,
    pub write_probe: WriteProbe,
    pub failed_samples: Vec<&'static str>,
    pub vector_search_available: bool,
}

impl PreflightReport {
    /// True when every table was readable, writes were refused, and every
    /// sample ran. Vector search is optional and does not count.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.tables.iter().all(|check| check.rows.is_ok())
            && matches!(self.write_probe, WriteProbe::Denied { .. })
            && self.failed_samples.is_empty()
    }
}

/// Runs the checklist against `store`, writing human-readable lines to `out`.
pub struct Preflight<'a, S: KayStore, W: Write + Send> {
    store: &'a S,
    out: W,
    connected: bool,
}

impl<'a, S: KayStore, W: Write + Send> Preflight<'a, S, W> {
    pub const fn new(store: &'a S, out: W) -> Self {
        Self {
            store,
            out,
            connected: false,
        }
    }

    /// True once the connectivity step has reached the database, even if a
    /// later write to the report failed.
    #[must_use]
    pub const fn connected(&self) -> bool {
        self.connected
    }

    /// Runs every step in order.
    ///
    /// # Errors
    /// Returns `PreflightError::Connection` if the first query fails, or
    /// `PreflightError::Io` if the report cannot be written.
    pub async fn run(&mut self) -> Result<PreflightReport, PreflightError> {
        writeln!(self.out, "🔍 Testing KAY Query MCP Tool\n")?;
        writeln!(self.out, "{RULE}\n")?;

        let connection = self.check_connection().await?;
        let tables = self.check_read_access().await?;
        let write_probe = self.check_write_probe().await?;
        let failed_samples = self.run_samples().await?;
        let vector_search_available = self.check_vector_search().await?;

        let report = PreflightReport {
            connection,
            tables,
            write_probe,
            failed_samples,
            vector_search_available,
        };

        writeln!(self.out, "{RULE}\n")?;
        if report.is_clean() {
            writeln!(self.out, "{PASS} ALL TESTS PASSED\n")?;
            writeln!(
                self.out,
                "The MCP tool should work correctly with this database connection.\n"
            )?;
        } else {
            writeln!(self.out, "{WARN} CHECKLIST FINISHED WITH WARNINGS\n")?;
            writeln!(self.out, "Review the marked lines above before sharing this connection.\n")?;
        }
        writeln!(self.out, "Next steps:")?;
        writeln!(self.out, "1. Copy this connection string into the client's MCP server config")?;
        writeln!(self.out, "2. Restart the assistant client")?;
        writeln!(self.out, "3. Call get_memory_topics to confirm the tools are listed\n")?;

        Ok(report)
    }

    /// Step 1: connectivity and server identity.
    ///
    /// # Errors
    /// Returns `PreflightError::Connection` when the database is unreachable.
    pub async fn check_connection(&mut self) -> Result<ConnectionInfo, PreflightError> {
        writeln!(self.out, "TEST 1: Database Connection")?;
        let rows = self
            .store
            .fetch_rows(CONNECTION_SQL)
            .await
            .map_err(PreflightError::Connection)?;
        self.connected = true;
        let row = rows.first();
        let info = ConnectionInfo {
            database: text(row, "db"),
            user: text(row, "db_user"),
            time: format_time(&text(row, "time")),
        };
        writeln!(self.out, "{PASS} Connected successfully")?;
        writeln!(self.out, "   Database: {}", info.database)?;
        writeln!(self.out, "   User: {}", info.user)?;
        writeln!(self.out, "   Time: {}\n", info.time)?;
        Ok(info)
    }

    /// Step 2: row counts for the fixed table allow-list.
    ///
    /// # Errors
    /// Returns `PreflightError::Io` if the report cannot be written.
    pub async fn check_read_access(&mut self) -> Result<Vec<TableCheck>, PreflightError> {
        writeln!(self.out, "TEST 2: Read Permissions")?;
        let mut checks = Vec::with_capacity(READ_PROBES.len());
        for probe in READ_PROBES {
            let rows = match self.store.fetch_rows(probe.statement).await {
                Ok(rows) => {
                    let count = count(rows.first());
                    writeln!(self.out, "{PASS} Can read {}: {count} rows", probe.table)?;
                    Ok(count)
                }
                Err(err) => {
                    writeln!(self.out, "{FAIL} Cannot read {}: {err}", probe.table)?;
                    Err(err.to_string())
                }
            };
            checks.push(TableCheck {
                table: probe.table,
                rows,
            });
        }
        writeln!(self.out)?;
        Ok(checks)
    }

    /// Step 3: a write that a read-only role must refuse.
    ///
    /// Only a privilege error counts as a refusal. Any other failure, such as
    /// a leftover scratch table, leaves the role's privileges unknown. If the
    /// write goes through, the scratch table is dropped again.
    ///
    /// # Errors
    /// Returns `PreflightError::Io` if the report cannot be written.
    pub async fn check_write_probe(&mut self) -> Result<WriteProbe, PreflightError> {
        writeln!(self.out, "TEST 3: Write Permissions (should fail for read-only)")?;
        let probe = match self.store.execute(WRITE_PROBE_CREATE_SQL).await {
            Err(err) if err.is_permission_denied() => {
                debug!(error = %err, "write probe refused");
                writeln!(self.out, "{PASS} Write denied (correct for read-only user)")?;
                WriteProbe::Denied {
                    reason: err.to_string(),
                }
            }
            Err(err) => {
                warn!(error = %err, "write probe failed without a privilege error");
                writeln!(self.out, "{WARN} Write probe inconclusive: {err}")?;
                writeln!(
                    self.out,
                    "   Could not tell whether this user can write; check for a leftover {TABLE_WRITE_PROBE} table"
                )?;
                WriteProbe::Inconclusive {
                    reason: err.to_string(),
                }
            }
            Ok(_) => {
                warn!(table = TABLE_WRITE_PROBE, "connection role has write access");
                writeln!(
                    self.out,
                    "{WARN} WARNING: User has WRITE access (should be read-only!)"
                )?;
                let dropped = match self.store.execute(WRITE_PROBE_DROP_SQL).await {
                    Ok(_) => true,
                    Err(err) => {
                        writeln!(
                            self.out,
                            "{FAIL} Could not drop {TABLE_WRITE_PROBE}: {err}"
                        )?;
                        false
                    }
                };
                WriteProbe::Allowed { dropped }
            }
        };
        writeln!(self.out)?;
        Ok(probe)
    }

    /// Step 4: the catalog's own statements, run directly against the store.
    ///
    /// Returns the names of the samples that failed.
    ///
    /// # Errors
    /// Returns `PreflightError::Io` if the report cannot be written.
    pub async fn run_samples(&mut self) -> Result<Vec<&'static str>, PreflightError> {
        writeln!(self.out, "TEST 4: Sample Queries\n")?;
        let mut failed = Vec::new();

        writeln!(self.out, "Query: Recent Syncs")?;
        match self.store.fetch_rows(QueryEntity::RecentSyncs.statement()).await {
            Ok(syncs) => {
                writeln!(self.out, "{PASS} Retrieved {} sync runs", syncs.len())?;
                if let Some(latest) = syncs.first() {
                    writeln!(
                        self.out,
                        "   Latest: {} ({})",
                        text(Some(latest), "script_name"),
                        text(Some(latest), "status")
                    )?;
                }
            }
            Err(err) => {
                writeln!(self.out, "{FAIL} Recent syncs failed: {err}")?;
                failed.push(QueryEntity::RecentSyncs.as_str());
            }
        }
        writeln!(self.out)?;

        writeln!(self.out, "Query: Sample Task")?;
        match self.store.fetch_rows(QueryEntity::SampleTask.statement()).await {
            Ok(tasks) => match tasks.first() {
                Some(task) => {
                    writeln!(self.out, "{PASS} Retrieved task: \"{}\"", text(Some(task), "name"))?;
                    writeln!(
                        self.out,
                        "   Status: {}, Priority: {}",
                        text(Some(task), "status"),
                        text(Some(task), "priority")
                    )?;
                }
                None => writeln!(self.out, "{WARN} No tasks found")?,
            },
            Err(err) => {
                writeln!(self.out, "{FAIL} Sample task failed: {err}")?;
                failed.push(QueryEntity::SampleTask.as_str());
            }
        }
        writeln!(self.out)?;

        writeln!(self.out, "Query: Files Summary")?;
        match self.store.fetch_rows(QueryEntity::FilesSummary.statement()).await {
            Ok(files) => {
                writeln!(self.out, "{PASS} Files by PARA type:")?;
                for file in &files {
                    writeln!(
                        self.out,
                        "   {}: {}",
                        text(Some(file), "suggested_para_type"),
                        count(Some(file))
                    )?;
                }
            }
            Err(err) => {
                writeln!(self.out, "{FAIL} Files summary failed: {err}")?;
                failed.push(QueryEntity::FilesSummary.as_str());
            }
        }
        writeln!(self.out)?;

        Ok(failed)
    }

    /// Step 5: embedding count plus a zero-vector similarity query.
    ///
    /// Unavailability (no pgvector, no table) is reported as a warning.
    ///
    /// # Errors
    /// Returns `PreflightError::Io` if the report cannot be written.
    pub async fn check_vector_search(&mut self) -> Result<bool, PreflightError> {
        writeln!(self.out, "TEST 5: Vector Search (Embeddings)")?;
        let available = match probe_vectors(self.store).await {
            Ok((chunks, results)) => {
                writeln!(self.out, "{PASS} Found {chunks} chunks with embeddings")?;
                writeln!(
                    self.out,
                    "{PASS} Vector search works (retrieved {results} results)"
                )?;
                if results > 0 {
                    writeln!(
                        self.out,
                        "   Note: a real query embedding is needed for meaningful results"
                    )?;
                }
                true
            }
            Err(err) => {
                writeln!(self.out, "{WARN} Vector search unavailable: {err}")?;
                false
            }
        };
        writeln!(self.out)?;
        Ok(available)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

async fn probe_vectors<S: KayStore>(store: &S) -> Result<(i64, usize), StoreError> {
    let chunks = store.fetch_rows(EMBEDDED_CHUNKS_SQL).await?;
    let results = store.fetch_rows(VECTOR_PROBE_SQL).await?;
    debug!(dimensions = EMBEDDING_DIMENSIONS, "zero-vector probe returned");
    Ok((count(chunks.first()), results.len()))
}

fn text(row: Option<&Row>, column: &str) -> String {
    match row.and_then(|row| row.get(column)) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn count(row: Option<&Row>) -> i64 {
    row.map_or(0, |row| {
        crate::catalog::query::sum_column(std::slice::from_ref(row), "count")
    })
}

fn format_time(raw: &str) -> String {
    DateTime::<FixedOffset>::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |time| time.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_search_matches_embedding_dimensions() {
        assert!(VECTOR_PROBE_SQL.contains(&format!("ARRAY[{EMBEDDING_DIMENSIONS}]")));
    }

    #[test]
    fn write_probe_targets_scratch_table() {
        assert!(WRITE_PROBE_CREATE_SQL.contains(TABLE_WRITE_PROBE));
        assert!(WRITE_PROBE_DROP_SQL.ends_with(TABLE_WRITE_PROBE));
    }

    #[test]
    fn formats_postgres_json_timestamps() {
        assert_eq!(
            format_time("2026-10-19T08:30:00.123456+00:00"),
            "2026-10-19 08:30:00 +00:00"
        );
        assert_eq!(format_time("yesterday"), "yesterday");
    }
}

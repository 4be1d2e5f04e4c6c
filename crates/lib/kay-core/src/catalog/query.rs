//! Live queries against KAY's database.
//!
//! Each [`QueryEntity`] owns exactly one literal, parameterless, read-only
//! statement. Nothing a caller sends is ever spliced into SQL text.

use std::fmt;
use std::str::FromStr;

use kay_store::{Envelope, Row, UnknownKey};
use serde_json::{Map, Value};

use crate::store::{KayStore, StoreResult};

const RECENT_SYNCS_SQL: &str = r"
SELECT
  script_name,
  started_at,
  completed_at,
  status,
  records_processed,
  duration_ms,
  errors
FROM sync_run_history
ORDER BY started_at DESC
LIMIT 20";

const SYNC_HEALTH_SQL: &str = r"
SELECT
  script_name,
  COUNT(*) AS total_runs,
  COUNT(*) FILTER (WHERE status = 'success') AS successful,
  COUNT(*) FILTER (WHERE status = 'error') AS failed,
  AVG(duration_ms)::int AS avg_duration_ms,
  MAX(started_at) AS last_run
FROM sync_run_history
WHERE started_at > NOW() - INTERVAL '7 days'
GROUP BY script_name
ORDER BY last_run DESC";

const SAMPLE_TASK_SQL: &str = r"
SELECT
  name,
  status,
  priority,
  due_at,
  notion_page_id,
  sql_local_last_edited_at,
  notion_last_edited_at,
  sql_updated_at
FROM tasks
WHERE deleted_at IS NULL
ORDER BY sql_updated_at DESC
LIMIT 1";

const TASKS_SUMMARY_SQL: &str = r"
SELECT
  status,
  COUNT(*) AS count,
  COUNT(*) FILTER (WHERE priority = 'high') AS high_priority,
  COUNT(*) FILTER (WHERE due_at < NOW()) AS overdue,
  COUNT(*) FILTER (WHERE notion_page_id IS NOT NULL) AS synced_to_notion
FROM tasks
WHERE deleted_at IS NULL
GROUP BY status";

const FILES_SUMMARY_SQL: &str = r"
SELECT
  suggested_para_type,
  COUNT(*) AS count,
  COUNT(*) FILTER (WHERE embedding IS NOT NULL) AS embedded,
  AVG(classification_confidence)::numeric(3,2) AS avg_confidence
FROM files
WHERE suggested_para_type IS NOT NULL
GROUP BY suggested_para_type
ORDER BY count DESC";

const TELEGRAM_STATS_SQL: &str = r"
SELECT
  operation_type,
  COUNT(*) AS count
FROM bot_logs
WHERE created_at > NOW() - INTERVAL '7 days'
GROUP BY operation_type
ORDER BY count DESC
LIMIT 10";

const DATABASE_SCHEMA_SQL: &str = r"
SELECT
  table_name,
  (SELECT COUNT(*) FROM information_schema.columns c WHERE c.table_name = t.table_name) AS column_count,
  pg_size_pretty(pg_total_relation_size(quote_ident(table_name))) AS size
FROM information_schema.tables t
WHERE table_schema = 'public'
ORDER BY pg_total_relation_size(quote_ident(table_name)) DESC";

const NOTION_DATABASES_SQL: &str = r"
SELECT
  'tasks' AS database,
  COUNT(*) AS total_records,
  COUNT(*) FILTER (WHERE notion_page_id IS NOT NULL) AS synced,
  COUNT(*) FILTER (WHERE sql_local_last_edited_at IS NOT NULL) AS pending_sync
FROM tasks WHERE deleted_at IS NULL
UNION ALL
SELECT
  'projects' AS database,
  COUNT(*) AS total_records,
  COUNT(*) FILTER (WHERE notion_page_id IS NOT NULL) AS synced,
  COUNT(*) FILTER (WHERE sql_local_last_edited_at IS NOT NULL) AS pending_sync
FROM projects WHERE deleted_at IS NULL
UNION ALL
SELECT
  'notes' AS database,
  COUNT(*) AS total_records,
  COUNT(*) FILTER (WHERE notion_page_id IS NOT NULL) AS synced,
  COUNT(*) FILTER (WHERE sql_local_last_edited_at IS NOT NULL) AS pending_sync
FROM notes WHERE deleted_at IS NULL";

const CALENDAR_SUMMARY_SQL: &str = r"
SELECT
  DATE(start_time) AS date,
  COUNT(*) AS events,
  string_agg(DISTINCT source, ', ') AS sources
FROM calendar_events
WHERE start_time BETWEEN NOW() - INTERVAL '7 days' AND NOW() + INTERVAL '7 days'
GROUP BY DATE(start_time)
ORDER BY date";

const LLM_MODELS_SQL: &str = r"
SELECT
  provider,
  COUNT(*) AS model_count,
  AVG(cost_per_1k_input)::numeric(10,5) AS avg_input_cost,
  AVG(cost_per_1k_output)::numeric(10,5) AS avg_output_cost
FROM llm_models
GROUP BY provider
ORDER BY model_count DESC";

/// Reported when the success-rate window holds no runs.
pub const RATE_NOT_AVAILABLE: &str = "N/A";

/// The closed set of live queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryEntity {
    RecentSyncs,
    SyncHealth,
    SampleTask,
    TasksSummary,
    FilesSummary,
    TelegramStats,
    DatabaseSchema,
    NotionDatabases,
    CalendarSummary,
    LlmModels,
}

impl QueryEntity {
    pub const ALL: [Self; 10] = [
        Self::RecentSyncs,
        Self::SyncHealth,
        Self::SampleTask,
        Self::TasksSummary,
        Self::FilesSummary,
        Self::TelegramStats,
        Self::DatabaseSchema,
        Self::NotionDatabases,
        Self::CalendarSummary,
        Self::LlmModels,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecentSyncs => "recent-syncs",
            Self::SyncHealth => "sync-health",
            Self::SampleTask => "sample-task",
            Self::TasksSummary => "tasks-summary",
            Self::FilesSummary => "files-summary",
            Self::TelegramStats => "telegram-stats",
            Self::DatabaseSchema => "database-schema",
            Self::NotionDatabases => "notion-databases",
            Self::CalendarSummary => "calendar-summary",
            Self::LlmModels => "llm-models",
        }
    }

    /// Every accepted entity name, in catalog order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::as_str)
    }

    #[must_use]
    pub const fn statement(self) -> &'static str {
        match self {
            Self::RecentSyncs => RECENT_SYNCS_SQL,
            Self::SyncHealth => SYNC_HEALTH_SQL,
            Self::SampleTask => SAMPLE_TASK_SQL,
            Self::TasksSummary => TASKS_SUMMARY_SQL,
            Self::FilesSummary => FILES_SUMMARY_SQL,
            Self::TelegramStats => TELEGRAM_STATS_SQL,
            Self::DatabaseSchema => DATABASE_SCHEMA_SQL,
            Self::NotionDatabases => NOTION_DATABASES_SQL,
            Self::CalendarSummary => CALENDAR_SUMMARY_SQL,
            Self::LlmModels => LLM_MODELS_SQL,
        }
    }

    /// Runs this entity's statement and shapes the rows into an envelope.
    ///
    /// # Errors
    /// Returns `StoreError` if the statement fails; nothing is retried.
    pub async fn execute<S: KayStore>(self, store: &S) -> StoreResult<Envelope> {
        let rows = store.fetch_rows(self.statement()).await?;
        Ok(self.shape(rows))
    }

    fn shape(self, rows: Vec<Row>) -> Envelope {
        match self {
            Self::RecentSyncs => Envelope::new("KAY's recent sync runs (last 20)")
                .with_data(rows)
                .with_note("This is live data from KAY's actual system"),
            Self::SyncHealth => {
                let metrics = sync_health_metrics(&rows);
                Envelope::new("KAY's sync health (last 7 days)")
                    .with_data(rows)
                    .with_metrics(metrics)
            }
            Self::SampleTask => {
                let task = rows.into_iter().next().map_or(Value::Null, Value::Object);
                Envelope::new("A real task from KAY's database")
                    .with_data(task)
                    .with_note("Shows actual field structure, sync timestamps, Notion page ID format")
            }
            Self::TasksSummary => {
                let total = sum_column(&rows, "count");
                Envelope::new("KAY's task statistics")
                    .with_data(rows)
                    .with_field("total", total)
            }
            Self::FilesSummary => Envelope::new("KAY's file organization (PARA distribution)")
                .with_data(rows)
                .with_note("Shows how KAY classifies files into Projects/Areas/Resources/Archive"),
            Self::TelegramStats => Envelope::new("KAY's Telegram bot usage (last 7 days)")
                .with_data(rows)
                .with_note("Shows which operations are most commonly used"),
            Self::DatabaseSchema => {
                let total_tables = rows.len();
                Envelope::new("KAY's database schema")
                    .with_data(rows)
                    .with_field("total_tables", total_tables)
            }
            Self::NotionDatabases => Envelope::new("KAY's Notion sync status")
                .with_data(rows)
                .with_note("Shows sync coverage for main databases"),
            Self::CalendarSummary => {
                Envelope::new("KAY's calendar (7 days back, 7 days forward)").with_data(rows)
            }
            Self::LlmModels => Envelope::new("LLM models in KAY's database").with_data(rows),
        }
    }
}

impl fmt::Display for QueryEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryEntity {
    type Err = UnknownKey;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == name)
            .ok_or_else(|| UnknownKey::new("entity", name, Self::names()))
    }
}

fn sync_health_metrics(rows: &[Row]) -> Map<String, Value> {
    let successful = sum_column(rows, "successful");
    let total_runs = sum_column(rows, "total_runs");

    let mut metrics = Map::new();
    metrics.insert("total_scripts".to_string(), Value::from(rows.len()));
    metrics.insert(
        "overall_success_rate".to_string(),
        Value::from(success_rate(successful, total_runs)),
    );
    metrics
}

/// Formats `successful / total` as a one-decimal percentage.
///
/// A zero or negative `total` yields [`RATE_NOT_AVAILABLE`].
#[must_use]
pub fn success_rate(successful: i64, total: i64) -> String {
    if total <= 0 {
        return RATE_NOT_AVAILABLE.to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let percent = successful as f64 / total as f64 * 100.0;
    format!("{percent:.1}%")
}

/// Sums an integer column across rows, accepting numbers or numeric strings.
#[must_use]
pub fn sum_column(rows: &[Row], column: &str) -> i64 {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter_map(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
        .sum()
}

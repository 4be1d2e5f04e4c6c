use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use kay_store::Row;

use super::{KayStore, SQLSTATE_INSUFFICIENT_PRIVILEGE, StoreError, StoreResult};

const PERMISSION_DENIED: &str = "permission denied for schema public";

#[derive(Debug, Clone)]
struct ScriptedFailure {
    code: Option<&'static str>,
    message: String,
}

impl ScriptedFailure {
    fn to_error(&self) -> StoreError {
        match self.code {
            Some(code) => StoreError::Database {
                code: code.to_string(),
                message: self.message.clone(),
            },
            None => StoreError::Backend(self.message.clone()),
        }
    }
}

/// In-memory store answering scripted rows per statement.
///
/// Unscripted statements return no rows. Writes are refused unless the store
/// is built with [`MemoryStore::writable`], mirroring a read-only role.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: HashMap<&'static str, Vec<Row>>,
    failures: HashMap<&'static str, ScriptedFailure>,
    fail_all: Option<ScriptedFailure>,
    writable: bool,
    tables: Mutex<BTreeSet<String>>,
    executed: Mutex<Vec<&'static str>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(mut self, statement: &'static str, rows: Vec<Row>) -> Self {
        self.rows.insert(statement, rows);
        self
    }

    #[must_use]
    pub fn with_failure(mut self, statement: &'static str, message: impl Into<String>) -> Self {
        self.failures.insert(
            statement,
            ScriptedFailure {
                code: None,
                message: message.into(),
            },
        );
        self
    }

    /// Fails `statement` the way the server would, with a SQLSTATE code.
    #[must_use]
    pub fn with_database_error(
        mut self,
        statement: &'static str,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert(
            statement,
            ScriptedFailure {
                code: Some(code),
                message: message.into(),
            },
        );
        self
    }

    /// Makes every statement fail, as an unreachable database would.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_all = Some(ScriptedFailure {
            code: None,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub const fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Statements passed to [`KayStore::execute`], in order, including refused ones.
    pub fn executed(&self) -> Vec<&'static str> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tables created through [`KayStore::execute`] and not yet dropped.
    pub fn created_tables(&self) -> Vec<String> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn scripted_failure(&self, statement: &'static str) -> Option<StoreError> {
        self.fail_all
            .as_ref()
            .or_else(|| self.failures.get(statement))
            .map(ScriptedFailure::to_error)
    }

    fn apply_ddl(&self, statement: &str) {
        let words: Vec<&str> = statement.split_whitespace().collect();
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        match words.as_slice() {
            [create, table, name, ..]
                if create.eq_ignore_ascii_case("create") && table.eq_ignore_ascii_case("table") =>
            {
                tables.insert((*name).to_string());
            }
            [drop, table, if_, exists, name, ..]
                if drop.eq_ignore_ascii_case("drop")
                    && table.eq_ignore_ascii_case("table")
                    && if_.eq_ignore_ascii_case("if")
                    && exists.eq_ignore_ascii_case("exists") =>
            {
                tables.remove(*name);
            }
            [drop, table, name, ..]
                if drop.eq_ignore_ascii_case("drop") && table.eq_ignore_ascii_case("table") =>
            {
                tables.remove(*name);
            }
            _ => {}
        }
    }
}

impl KayStore for MemoryStore {
    async fn fetch_rows(&self, statement: &'static str) -> StoreResult<Vec<Row>> {
        if let Some(err) = self.scripted_failure(statement) {
            return Err(err);
        }
        Ok(self.rows.get(statement).cloned().unwrap_or_default())
    }

    async fn execute(&self, statement: &'static str) -> StoreResult<u64> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(statement);
        if let Some(err) = self.scripted_failure(statement) {
            return Err(err);
        }
        if !self.writable {
            return Err(StoreError::Database {
                code: SQLSTATE_INSUFFICIENT_PRIVILEGE.to_string(),
                message: PERMISSION_DENIED.to_string(),
            });
        }
        self.apply_ddl(statement);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn returns_scripted_rows() {
        let store = MemoryStore::new().with_rows("SELECT 1", vec![row(json!({"n": 1}))]);

        let rows = store.fetch_rows("SELECT 1").await.expect("scripted rows");
        assert_eq!(rows.len(), 1);
        assert!(store.fetch_rows("SELECT 2").await.expect("empty").is_empty());
    }

    #[tokio::test]
    async fn read_only_store_refuses_writes() {
        let store = MemoryStore::new();

        let err = store
            .execute("CREATE TABLE scratch (id int)")
            .await
            .expect_err("write should be refused");
        assert_eq!(err.to_string(), PERMISSION_DENIED);
        assert!(err.is_permission_denied());
        assert!(store.created_tables().is_empty());
        assert_eq!(store.executed(), vec!["CREATE TABLE scratch (id int)"]);
    }

    #[tokio::test]
    async fn scripted_database_error_carries_sqlstate() {
        let store = MemoryStore::new()
            .writable()
            .with_database_error("CREATE TABLE scratch (id int)", "42P07", "relation exists");

        let err = store
            .execute("CREATE TABLE scratch (id int)")
            .await
            .expect_err("scripted failure wins over writable");
        assert_eq!(err.sqlstate().as_deref(), Some("42P07"));
        assert!(!err.is_permission_denied());
    }

    #[tokio::test]
    async fn writable_store_tracks_tables() {
        let store = MemoryStore::new().writable();

        store.execute("CREATE TABLE scratch (id int)").await.expect("create");
        assert_eq!(store.created_tables(), vec!["scratch".to_string()]);
        store.execute("DROP TABLE IF EXISTS scratch").await.expect("drop");
        assert!(store.created_tables().is_empty());
    }
}

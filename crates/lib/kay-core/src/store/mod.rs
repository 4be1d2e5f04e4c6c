//! Store interface and implementations.
//!
//! Every statement a store runs is a `&'static str`, so caller-supplied text
//! can never reach the database.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;

use std::{borrow::Cow, error::Error, fmt, future::Future};

use kay_store::Row;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::{PgKayStore, PgStoreOptions};

/// SQLSTATE `insufficient_privilege`.
pub const SQLSTATE_INSUFFICIENT_PRIVILEGE: &str = "42501";
/// SQLSTATE `read_only_sql_transaction`.
pub const SQLSTATE_READ_ONLY_TRANSACTION: &str = "25006";

#[derive(Debug)]
pub enum StoreError {
    Sqlx(Box<sqlx::Error>),
    Database { code: String, message: String },
    Backend(String),
}

impl StoreError {
    /// The server's SQLSTATE code, when the failure came from the database.
    #[must_use]
    pub fn sqlstate(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Sqlx(err) => err.as_database_error().and_then(|db| db.code()),
            Self::Database { code, .. } => Some(Cow::Borrowed(code.as_str())),
            Self::Backend(_) => None,
        }
    }

    /// True only when the server refused the statement for lack of privileges.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        self.sqlstate().is_some_and(|code| {
            code == SQLSTATE_INSUFFICIENT_PRIVILEGE || code == SQLSTATE_READ_ONLY_TRANSACTION
        })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlx(err) => write!(f, "database error: {err}"),
            Self::Database { message, .. } | Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlx(err) => Some(err.as_ref()),
            Self::Database { .. } | Self::Backend(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to the external KAY database.
pub trait KayStore: Send + Sync {
    /// Runs a literal statement and returns its rows as JSON objects.
    fn fetch_rows(&self, statement: &'static str) -> impl Future<Output = StoreResult<Vec<Row>>> + Send;

    /// Runs a literal statement that returns no rows.
    fn execute(&self, statement: &'static str) -> impl Future<Output = StoreResult<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(code: &str) -> StoreError {
        StoreError::Database {
            code: code.to_string(),
            message: format!("sqlstate {code}"),
        }
    }

    #[test]
    fn only_privilege_codes_count_as_denied() {
        assert!(database(SQLSTATE_INSUFFICIENT_PRIVILEGE).is_permission_denied());
        assert!(database(SQLSTATE_READ_ONLY_TRANSACTION).is_permission_denied());
        assert!(!database("42P07").is_permission_denied());
        assert!(!StoreError::Backend("permission denied for schema public".to_string())
            .is_permission_denied());
    }

    #[test]
    fn database_error_displays_server_message() {
        let err = database("42P07");
        assert_eq!(err.sqlstate().as_deref(), Some("42P07"));
        assert_eq!(err.to_string(), "sqlstate 42P07");
    }
}

//! Query execution against the backing store.
//!
//! [`Executor`] holds a single `sqlx` connection opened through the `Any`
//! driver, so SQLite, PostgreSQL and MySQL URLs all work. Results are
//! normalized into [`ExecutionResult`]: rows for reads, an affected-row count
//! for everything else.

use std::{fs::OpenOptions, future::Future, path::Path};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use sqlx::{
    AnyConnection, Column, Connection, Row as _, TypeInfo, ValueRef,
    any::{AnyRow, install_default_drivers}
};
use tracing::debug;

use crate::{error::ExecutionError, query::is_select};

/// One result row, columns in result-set order
pub type Row = IndexMap<String, Value>;

/// Normalized outcome of a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    /// Rows returned by a read query
    Rows(Vec<Row>),
    /// Row count reported for a write query
    Affected { affected_rows: u64 }
}

impl ExecutionResult {
    /// JSON form used for output comparison
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Anything that can run a query and return a normalized result.
///
/// The test runner depends on this trait rather than on [`Executor`] so it
/// can be driven by wrappers (deadlines) and test doubles.
pub trait QueryExecutor {
    fn execute(
        &mut self,
        query: &str
    ) -> impl Future<Output = Result<ExecutionResult, ExecutionError>> + Send;
}

/// Executor owning one connection to the backing store
pub struct Executor {
    conn: Option<AnyConnection>
}

impl Executor {
    /// Open a connection to the store behind `url`.
    ///
    /// For a file-backed SQLite URL the database file is created first when
    /// it does not exist yet.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sql_query_tester::executor::{ExecutionResult, Executor};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut executor = Executor::connect("sqlite::memory:").await?;
    /// let result = executor.execute("SELECT 1 AS one").await?;
    /// assert!(matches!(result, ExecutionResult::Rows(_)));
    /// executor.close().await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self, ExecutionError> {
        install_default_drivers();
        if let Some(path) = sqlite_file_path(url) {
            ensure_sqlite_file(url, path)?;
        }
        let conn = AnyConnection::connect(url)
            .await
            .map_err(|source| ExecutionError::Connect {
                url: url.to_string(),
                source
            })?;
        debug!("connected to store");
        Ok(Self {
            conn: Some(conn)
        })
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Run a query and normalize its result.
    ///
    /// Queries starting with `SELECT` (case-insensitive, after trimming) are
    /// fetched as rows; anything else reports affected rows.
    pub async fn execute(&mut self, query: &str) -> Result<ExecutionResult, ExecutionError> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(ExecutionError::Closed {
                query: query.to_string()
            });
        };
        let failed = |source: sqlx::Error| ExecutionError::Query {
            query: query.to_string(),
            source
        };

        if is_select(query) {
            debug!(query, "fetching rows");
            let rows = sqlx::Executor::fetch_all(&mut *conn, sqlx::query(query))
                .await
                .map_err(failed)?;
            Ok(ExecutionResult::Rows(rows.iter().map(convert_row).collect()))
        } else {
            debug!(query, "executing statement");
            let done = sqlx::Executor::execute(&mut *conn, sqlx::raw_sql(query))
                .await
                .map_err(failed)?;
            Ok(ExecutionResult::Affected {
                affected_rows: done.rows_affected()
            })
        }
    }

    /// Release the connection. Calling it again is a no-op.
    pub async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                debug!(error = %e, "error while closing connection");
            }
            debug!("connection closed");
        }
    }
}

impl QueryExecutor for Executor {
    fn execute(
        &mut self,
        query: &str
    ) -> impl Future<Output = Result<ExecutionResult, ExecutionError>> + Send {
        Executor::execute(self, query)
    }
}

/// Converts an `AnyRow` into an ordered column map.
fn convert_row(row: &AnyRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| (col.name().to_string(), convert_value(row, i)))
        .collect()
}

/// Converts a single column value to JSON.
fn convert_value(row: &AnyRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null
    };

    match type_name.as_str() {
        "BOOL" | "BOOLEAN" => row
            .try_get::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "SMALLINT" | "INT" | "INTEGER" | "BIGINT" => row
            .try_get::<i64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" | "FLOAT" | "DOUBLE" => row
            .try_get::<f64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null),
        _ => fallback_value(row, index)
    }
}

/// Tries text first, then the numeric kinds.
fn fallback_value(row: &AnyRow, index: usize) -> Value {
    if let Ok(s) = row.try_get::<String, _>(index) {
        return Value::String(s);
    }
    if let Ok(n) = row.try_get::<i64, _>(index) {
        return Value::from(n);
    }
    if let Ok(f) = row.try_get::<f64, _>(index) {
        return Value::from(f);
    }
    Value::Null
}

/// Path of the database file for a file-backed SQLite URL
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") || url.contains("mode=memory") {
        return None;
    }
    Some(path)
}

fn ensure_sqlite_file(url: &str, path: &str) -> Result<(), ExecutionError> {
    let path = Path::new(path);
    if path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "creating sqlite database file");
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map(|_| ())
        .map_err(|source| ExecutionError::CreateFile {
            url: url.to_string(),
            source
        })
}

use std::{io, path::Path};

pub use masterror::{AppError, AppResult};
use thiserror::Error;
use url::Url;

/// Create file read error
pub fn file_read_error(path: &str, source: io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create file write error
pub fn file_write_error(path: &Path, source: io::Error) -> AppError {
    AppError::internal(format!(
        "Failed to write file '{}': {}",
        path.display(),
        source
    ))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create report serialization error
pub fn report_error(message: impl Into<String>) -> AppError {
    AppError::internal(format!("Report generation failed: {}", message.into()))
}

/// Failure raised while talking to the backing store.
///
/// Every variant that concerns a statement keeps the original query text so
/// callers can report which statement failed.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Connection could not be established
    #[error("Failed to connect to '{}': {source}", redact_url(.url))]
    Connect {
        url:    String,
        #[source]
        source: sqlx::Error
    },
    /// Database file for a SQLite URL could not be created
    #[error("Failed to create database file for '{}': {source}", redact_url(.url))]
    CreateFile {
        url:    String,
        #[source]
        source: io::Error
    },
    /// Store rejected or failed the statement
    #[error("Query execution failed: {source}")]
    Query {
        query:  String,
        #[source]
        source: sqlx::Error
    },
    /// Executor was already closed
    #[error("Query execution failed: connection is closed")]
    Closed { query: String },
    /// External deadline expired before the store answered
    #[error("Query execution failed: timed out after {seconds} seconds")]
    Timeout { query: String, seconds: f64 }
}

impl ExecutionError {
    /// Query text that triggered the error, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Connect {
                ..
            }
            | Self::CreateFile {
                ..
            } => None,
            Self::Query {
                query, ..
            }
            | Self::Closed {
                query
            }
            | Self::Timeout {
                query, ..
            } => Some(query)
        }
    }
}

impl From<ExecutionError> for AppError {
    fn from(err: ExecutionError) -> Self {
        AppError::service(err.to_string())
    }
}

/// Failure raised while loading test case documents.
///
/// Any single bad document aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Document or directory could not be read
    #[error("Failed to read test cases from '{path}': {source}")]
    Io {
        path:   String,
        #[source]
        source: io::Error
    },
    /// Document is not valid YAML or does not match the expected shape
    #[error("Malformed test case document '{path}': {source}")]
    Parse {
        path:   String,
        #[source]
        source: serde_yaml::Error
    }
}

impl LoadError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source
        }
    }

    pub fn parse(path: &Path, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            source
        }
    }

    /// Path of the offending file or directory
    pub fn path(&self) -> &str {
        match self {
            Self::Io {
                path, ..
            }
            | Self::Parse {
                path, ..
            } => path
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Hide the password part of a connection URL.
///
/// Strings that do not parse as URLs, or carry no password, are returned
/// unchanged.
fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if url.password().is_none() || url.set_password(Some("***")).is_err() {
        return raw.to_string();
    }
    url.into()
}

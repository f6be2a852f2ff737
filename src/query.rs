//! Statement classification by leading keyword.
//!
//! Queries are never parsed. The statement type is decided by upper-casing
//! the trimmed text and checking which keyword it starts with, so a query
//! that merely begins with `SELECT` is always a read.

use serde::{Deserialize, Serialize};

/// Type of SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Unknown
}

impl QueryType {
    /// Classify a query by its leading keyword.
    ///
    /// # Example
    ///
    /// ```
    /// use sql_query_tester::query::QueryType;
    ///
    /// assert_eq!(QueryType::classify("  select 1"), QueryType::Select);
    /// assert_eq!(QueryType::classify("DROP TABLE users"), QueryType::Unknown);
    /// ```
    pub fn classify(query: &str) -> Self {
        let upper = query.trim().to_uppercase();
        if upper.starts_with("SELECT") {
            Self::Select
        } else if upper.starts_with("INSERT") {
            Self::Insert
        } else if upper.starts_with("UPDATE") {
            Self::Update
        } else if upper.starts_with("DELETE") {
            Self::Delete
        } else {
            Self::Unknown
        }
    }

    /// `None` for [`QueryType::Unknown`]
    pub fn known(self) -> Option<Self> {
        match self {
            Self::Unknown => None,
            other => Some(other)
        }
    }

    pub fn is_read(self) -> bool {
        self == Self::Select
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Unknown => write!(f, "UNKNOWN")
        }
    }
}

/// Returns true when the query would be executed as a read
pub fn is_select(query: &str) -> bool {
    QueryType::classify(query).is_read()
}

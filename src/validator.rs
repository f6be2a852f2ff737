//! Query validation without execution.
//!
//! Two independent checks feed a single ordered issue list:
//!
//! 1. Leading-keyword classification; anything other than
//!    `SELECT`/`INSERT`/`UPDATE`/`DELETE` is reported as unknown.
//! 2. A case-insensitive search for `DROP` or `TRUNCATE` anywhere in the text.
//!
//! Validation never fails: every finding is data in
//! [`ValidationResult::issues`].

use serde::Serialize;
use smallvec::SmallVec;

use crate::query::QueryType;

pub const UNKNOWN_QUERY_TYPE: &str = "Unknown query type";
pub const DANGEROUS_OPERATIONS: &str = "Query contains potentially dangerous operations";

const DANGEROUS_KEYWORDS: [&str; 2] = ["DROP", "TRUNCATE"];

/// Issue list sized for the two built-in checks
pub type IssueVec = SmallVec<[String; 2]>;

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid:   bool,
    pub query_type: Option<QueryType>,
    pub issues:     IssueVec
}

impl ValidationResult {
    fn from_parts(query_type: Option<QueryType>, issues: IssueVec) -> Self {
        Self {
            is_valid: issues.is_empty(),
            query_type,
            issues
        }
    }
}

/// Validate a query without running it.
///
/// # Example
///
/// ```
/// use sql_query_tester::{query::QueryType, validator::validate};
///
/// let ok = validate("SELECT id FROM users");
/// assert!(ok.is_valid);
/// assert_eq!(ok.query_type, Some(QueryType::Select));
///
/// let bad = validate("DROP TABLE users");
/// assert!(!bad.is_valid);
/// assert_eq!(bad.query_type, None);
/// assert_eq!(bad.issues.len(), 2);
/// ```
pub fn validate(query: &str) -> ValidationResult {
    let mut issues = IssueVec::new();

    let query_type = QueryType::classify(query).known();
    if query_type.is_none() {
        issues.push(UNKNOWN_QUERY_TYPE.to_string());
    }

    let upper = query.to_uppercase();
    if DANGEROUS_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        issues.push(DANGEROUS_OPERATIONS.to_string());
    }

    ValidationResult::from_parts(query_type, issues)
}

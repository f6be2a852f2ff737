//! Test case execution and result classification.
//!
//! Every case moves from `PENDING` to exactly one of `PASS`, `FAIL` or
//! `ERROR`. An executor error turns into an `ERROR` result for that case;
//! it never aborts the run.
//!
//! Outputs are compared structurally: both sides are converted to JSON, map
//! keys are sorted recursively and the canonical texts must match exactly.
//! Key order does not matter, value types do (`1` is not `"1"`).

use std::time::Instant;

use compact_str::CompactString;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    cases::{TestCase, TestCaseStore},
    error::LoadError,
    executor::QueryExecutor
};

/// Lifecycle state of a test result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pending,
    Pass,
    Fail,
    Error
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// Outcome of one test case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name:           CompactString,
    pub query:          String,
    pub status:         TestStatus,
    pub error:          Option<String>,
    /// Seconds spent in the executor; always zero for `ERROR`
    pub execution_time: f64
}

impl TestResult {
    /// Fresh result for a case that has not run yet
    pub fn pending(case: &TestCase) -> Self {
        Self {
            name:           case.name.clone(),
            query:          case.query.clone(),
            status:         TestStatus::Pending,
            error:          None,
            execution_time: 0.0
        }
    }

    fn finish(self, status: TestStatus, error: Option<String>, execution_time: f64) -> Self {
        debug_assert_eq!(self.status, TestStatus::Pending);
        Self {
            status,
            error,
            execution_time,
            ..self
        }
    }
}

/// Runs test cases from a store against an executor
#[derive(Debug, Clone)]
pub struct TestRunner {
    store: TestCaseStore
}

impl TestRunner {
    pub fn new(store: TestCaseStore) -> Self {
        Self {
            store
        }
    }

    pub fn store(&self) -> &TestCaseStore {
        &self.store
    }

    /// Load every case from the store and run them in load order.
    ///
    /// # Errors
    ///
    /// Only loading can fail; execution failures become `ERROR` results.
    pub async fn run<E: QueryExecutor>(&self, executor: &mut E) -> Result<Vec<TestResult>, LoadError> {
        let cases = self.store.load()?;
        Ok(run_cases(&cases, executor).await)
    }
}

/// Run the given cases in order, one result per case.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use sql_query_tester::{
///     cases::TestCase,
///     executor::Executor,
///     runner::{TestStatus, run_cases}
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut executor = Executor::connect("sqlite::memory:").await?;
/// let cases = vec![TestCase::new("t1", "SELECT 1", json!([{"1": 1}]))];
/// let results = run_cases(&cases, &mut executor).await;
/// assert_eq!(results[0].status, TestStatus::Pass);
/// # Ok(())
/// # }
/// ```
pub async fn run_cases<E: QueryExecutor>(cases: &[TestCase], executor: &mut E) -> Vec<TestResult> {
    let mut results = Vec::with_capacity(cases.len());
    for case in cases {
        let result = run_case(case, executor).await;
        match result.status {
            TestStatus::Error => warn!(
                name = %result.name,
                error = result.error.as_deref().unwrap_or_default(),
                "test case errored"
            ),
            status => info!(name = %result.name, %status, "test case finished")
        }
        results.push(result);
    }
    results
}

async fn run_case<E: QueryExecutor>(case: &TestCase, executor: &mut E) -> TestResult {
    let pending = TestResult::pending(case);
    let start = Instant::now();
    match executor.execute(&case.query).await {
        Err(e) => pending.finish(TestStatus::Error, Some(e.to_string()), 0.0),
        Ok(actual) => {
            let elapsed = start.elapsed().as_secs_f64();
            let actual = actual.to_value();
            if outputs_match(&actual, &case.expected_output) {
                pending.finish(TestStatus::Pass, None, elapsed)
            } else {
                let message = format!(
                    "Expected {}, got {}",
                    canonical_json(&case.expected_output),
                    canonical_json(&actual)
                );
                pending.finish(TestStatus::Fail, Some(message), elapsed)
            }
        }
    }
}

/// Structural equality after canonicalization.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sql_query_tester::runner::outputs_match;
///
/// assert!(outputs_match(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
/// assert!(!outputs_match(&json!({"a": 1, "b": 2}), &json!({"a": "1", "b": 2})));
/// ```
pub fn outputs_match(actual: &Value, expected: &Value) -> bool {
    canonical_json(actual) == canonical_json(expected)
}

/// Compact JSON text with map keys sorted at every level
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone()
    }
}

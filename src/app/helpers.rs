//! Helper functions for CLI operations.
//!
//! Input reading, exit code calculation and settings resolution shared by
//! the command handlers.

use std::io::{self, Read};

use crate::{
    cli::GlobalArgs,
    config::Config,
    error::{AppResult, config_error, file_read_error},
    report::Summary,
    security::{SecuritySummary, Severity, Vulnerability},
    validator::ValidationResult
};

/// Reads query text from the argument itself or from stdin when it is "-".
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the query is blank.
pub fn read_query_input(arg: &str) -> AppResult<String> {
    let query = if arg == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        buffer
    } else {
        arg.to_string()
    };
    if query.trim().is_empty() {
        return Err(config_error("No query provided"));
    }
    Ok(query)
}

/// `0` when valid, `1` otherwise.
pub fn validation_exit_code(result: &ValidationResult) -> i32 {
    if result.is_valid { 0 } else { 1 }
}

/// `0` when nothing was found, `1` for findings without severity.
pub fn scan_exit_code(vulns: &[Vulnerability]) -> i32 {
    if vulns.is_empty() { 0 } else { 1 }
}

/// Exit code reflecting the worst finding of an assessment:
/// - `0` - Secure
/// - `1` - Findings, none high severity
/// - `2` - At least one high severity finding
///
/// # Example
///
/// ```
/// use sql_query_tester::{app::assessment_exit_code, security::summarize};
///
/// assert_eq!(assessment_exit_code(&summarize(vec![])), 0);
/// ```
pub fn assessment_exit_code(summary: &SecuritySummary) -> i32 {
    match summary.worst() {
        Some(Severity::High) => 2,
        _ if summary.is_secure => 0,
        _ => 1
    }
}

/// `0` when every case passed, `1` otherwise.
pub fn run_exit_code(summary: &Summary) -> i32 {
    if summary.all_passed() { 0 } else { 1 }
}

/// Applies CLI overrides on top of loaded configuration.
pub fn apply_global_overrides(mut config: Config, global: &GlobalArgs) -> Config {
    if let Some(url) = &global.database_url {
        config.database.url = Some(url.clone());
    }
    if let Some(dir) = &global.cases_dir {
        config.tests.dir = dir.clone();
    }
    config
}

/// Parses the expected output given on the command line as JSON.
pub fn parse_expected_output(raw: &str) -> AppResult<serde_json::Value> {
    serde_json::from_str(raw)
        .map_err(|e| config_error(format!("Expected output is not valid JSON: {}", e)))
}

// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use serde_json::json;
use sql_query_tester::{
    cases::TestCase,
    executor::{ExecutionResult, Row},
    output::{
        OutputFormat, OutputOptions, format_execution, format_security_summary,
        format_test_cases, format_test_results, format_validation, format_vulnerabilities
    },
    report::Summary,
    runner::{TestResult, TestStatus},
    security::{InjectionScanner, summarize},
    validator::validate
};

fn plain() -> OutputOptions {
    OutputOptions {
        format:  OutputFormat::Text,
        colored: false
    }
}

fn as_json() -> OutputOptions {
    OutputOptions {
        format:  OutputFormat::Json,
        colored: false
    }
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
}

#[test]
fn test_format_validation_text() {
    let out = format_validation(&validate("DROP TABLE users"), &plain());
    assert!(out.contains("Query type: UNKNOWN"));
    assert!(out.contains("Invalid"));
    assert!(out.contains("  - Unknown query type"));
    assert!(out.contains("  - Query contains potentially dangerous operations"));
}

#[test]
fn test_format_validation_json() {
    let out = format_validation(&validate("SELECT 1"), &as_json());
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["is_valid"], true);
    assert_eq!(value["query_type"], "SELECT");
    assert_eq!(value["issues"], json!([]));
}

#[test]
fn test_format_validation_yaml() {
    let opts = OutputOptions {
        format:  OutputFormat::Yaml,
        colored: false
    };
    let out = format_validation(&validate("SELECT 1"), &opts);
    assert!(out.contains("is_valid: true"));
}

#[test]
fn test_format_execution_rows() {
    let mut row = Row::new();
    row.insert("id".to_string(), json!(1));
    row.insert("name".to_string(), json!("ann"));
    let out = format_execution(&ExecutionResult::Rows(vec![row]), &plain());
    assert!(out.starts_with("id | name\n"));
    assert!(out.contains("1 | ann\n"));
    assert!(out.contains("(1 row(s))"));
}

#[test]
fn test_format_execution_empty_and_affected() {
    assert_eq!(
        format_execution(&ExecutionResult::Rows(vec![]), &plain()),
        "(no rows)\n"
    );
    assert_eq!(
        format_execution(
            &ExecutionResult::Affected {
                affected_rows: 4
            },
            &plain()
        ),
        "4 row(s) affected\n"
    );
}

#[test]
fn test_format_execution_json_is_untagged() {
    let out = format_execution(
        &ExecutionResult::Affected {
            affected_rows: 1
        },
        &as_json()
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!({"affected_rows": 1}));
}

#[test]
fn test_format_vulnerabilities() {
    let scanner = InjectionScanner::new();
    assert_eq!(
        format_vulnerabilities(&[], &plain()),
        "No vulnerabilities found\n"
    );

    let out = format_vulnerabilities(&scanner.scan("DROP TABLE users"), &plain());
    assert!(out.contains("[DANGEROUS_OPERATION] Query contains dangerous operation: DROP"));
    assert!(out.contains("1 finding(s)"));
}

#[test]
fn test_format_security_summary() {
    let scanner = InjectionScanner::new();
    let summary = summarize(scanner.assess("SELECT password FROM users"));
    let out = format_security_summary(&summary, &plain());
    assert!(out.starts_with("=== Security Assessment ==="));
    assert!(out.contains("[HIGH] SENSITIVE_DATA"));
    assert!(out.contains("[MEDIUM] PARAMETERIZATION"));
    assert!(out.contains("Total: 2 (high: 1, medium: 1, low: 0)"));
    assert!(out.contains("Not secure"));
}

#[test]
fn test_format_secure_summary() {
    let out = format_security_summary(&summarize(vec![]), &plain());
    assert!(out.contains("Total: 0"));
    assert!(out.ends_with("Secure\n"));
}

#[test]
fn test_format_test_cases() {
    assert_eq!(format_test_cases(&[], &plain()), "No test cases found\n");

    let cases = vec![TestCase::new("one", "SELECT 1", json!([{"1": 1}]))];
    let out = format_test_cases(&cases, &plain());
    assert!(out.contains("#1 one"));
    assert!(out.contains("query:    SELECT 1"));
    assert!(out.contains(r#"expected: [{"1":1}]"#));
}

#[test]
fn test_format_test_results() {
    let results = vec![
        TestResult {
            name:           "ok".into(),
            query:          "SELECT 1".to_string(),
            status:         TestStatus::Pass,
            error:          None,
            execution_time: 0.01
        },
        TestResult {
            name:           "bad".into(),
            query:          "SELECT x".to_string(),
            status:         TestStatus::Error,
            error:          Some("Query execution failed: no such column: x".to_string()),
            execution_time: 0.0
        },
    ];
    let summary = Summary::from_results(&results);

    let out = format_test_results(&results, &summary, &plain());
    assert!(out.contains("PASS  ok"));
    assert!(out.contains("ERROR bad"));
    assert!(out.contains("no such column: x"));
    assert!(out.contains("2 total, 1 passed, 0 failed, 1 errors"));

    let json: serde_json::Value =
        serde_json::from_str(&format_test_results(&results, &summary, &as_json())).unwrap();
    assert_eq!(json["summary"]["error_tests"], 1);
    assert_eq!(json["results"][1]["status"], "ERROR");
}

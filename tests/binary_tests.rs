//! Integration tests for the sql-query-tester binary.

use std::fs;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sql-query-tester");
    cmd.env_remove("DATABASE_URL")
        .env_remove("TEST_CASES_DIR")
        .env_remove("REPORT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_validate_valid_query() {
    cmd()
        .args(["validate", "SELECT * FROM users", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Query type: SELECT"))
        .stdout(predicate::str::contains("Valid"));
}

#[test]
fn test_validate_invalid_query() {
    cmd()
        .args(["validate", "DROP TABLE users", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown query type"))
        .stdout(predicate::str::contains(
            "Query contains potentially dangerous operations"
        ));
}

#[test]
fn test_validate_json_output() {
    cmd()
        .args(["validate", "update t set a = 1", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"query_type\": \"UPDATE\""));
}

#[test]
fn test_validate_from_stdin() {
    cmd()
        .args(["validate", "-", "--no-color"])
        .write_stdin("SELECT 1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid"));
}

#[test]
fn test_blank_stdin_is_error() {
    cmd()
        .args(["validate", "-"])
        .write_stdin("   \n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_scan_clean_query() {
    cmd()
        .args(["scan", "SELECT id FROM users WHERE id = 1", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No vulnerabilities found"));
}

#[test]
fn test_scan_injection() {
    cmd()
        .args([
            "scan",
            "SELECT * FROM users WHERE name = '' OR '1'='1'",
            "--no-color"
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SQL_INJECTION"));
}

#[test]
fn test_assess_high_severity_exit_code() {
    cmd()
        .args(["scan", "--assess", "SELECT password FROM users", "--no-color"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Not secure"));
}

#[test]
fn test_assess_medium_only_exit_code() {
    cmd()
        .args(["scan", "--assess", "SELECT name FROM users", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[MEDIUM] PARAMETERIZATION"));
}

#[test]
fn test_assess_secure_exit_code() {
    cmd()
        .args(["scan", "--assess", "SELECT name FROM users WHERE id = ?"])
        .assert()
        .success();
}

#[test]
fn test_execute_against_memory_database() {
    cmd()
        .args([
            "--database-url",
            "sqlite::memory:",
            "execute",
            "SELECT 1 AS one",
            "-f",
            "json"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"one\": 1"));
}

#[test]
fn test_execute_refuses_invalid_query() {
    cmd()
        .args([
            "--database-url",
            "sqlite::memory:",
            "execute",
            "DROP TABLE users",
            "--no-color"
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid"));
}

#[test]
fn test_execute_failure_reports_error() {
    cmd()
        .args([
            "--database-url",
            "sqlite::memory:",
            "execute",
            "SELECT * FROM missing_table"
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_tests_add_list_run() {
    let dir = TempDir::new().unwrap();
    let cases = dir.path().join("cases");
    let reports = dir.path().join("reports");
    let cases_arg = cases.to_str().unwrap();

    cmd()
        .args([
            "--cases-dir",
            cases_arg,
            "tests",
            "add",
            "-n",
            "one",
            "-q",
            "SELECT 1",
            "-e",
            r#"[{"1": 1}]"#
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved test case to"));

    cmd()
        .args(["--cases-dir", cases_arg, "tests", "list", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 one"));

    cmd()
        .args([
            "--cases-dir",
            cases_arg,
            "--database-url",
            "sqlite::memory:",
            "--no-color",
            "tests",
            "run",
            "--report-format",
            "json",
            "--report-dir",
            reports.to_str().unwrap()
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS  one"))
        .stdout(predicate::str::contains("1 total, 1 passed"));

    let written: Vec<_> = fs::read_dir(&reports).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_tests_run_failure_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("cases.yaml"),
        "test_cases:\n  - name: wrong\n    query: SELECT 1\n    expected_output:\n      - \"1\": \"1\"\n  - name: broken\n    query: SELECT * FROM missing\n    expected_output: []\n"
    )
    .unwrap();

    cmd()
        .args([
            "--cases-dir",
            dir.path().to_str().unwrap(),
            "--database-url",
            "sqlite::memory:",
            "--no-color",
            "tests",
            "run",
            "--no-report"
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL  wrong"))
        .stdout(predicate::str::contains("ERROR broken"));
}

#[test]
fn test_tests_run_malformed_document() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.yaml"), "cases: []\n").unwrap();

    cmd()
        .args([
            "--cases-dir",
            dir.path().to_str().unwrap(),
            "--database-url",
            "sqlite::memory:",
            "tests",
            "run",
            "--no-report"
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_tests_add_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args([
            "--cases-dir",
            dir.path().to_str().unwrap(),
            "tests",
            "add",
            "-n",
            "x",
            "-q",
            "SELECT 1",
            "-e",
            "{not json"
        ])
        .assert()
        .code(1);
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sql-query-tester"));
}

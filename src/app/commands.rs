//! Command handlers.
//!
//! Each handler returns a [`CommandOutput`] instead of printing, so the
//! binary and the tests share the same code path.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::{
    deadline::DeadlineExecutor,
    helpers::{
        assessment_exit_code, parse_expected_output, run_exit_code, scan_exit_code,
        validation_exit_code
    },
    types::{CommandOutput, RunParams}
};
use crate::{
    cases::{TestCase, TestCaseStore},
    config::Config,
    error::AppResult,
    executor::{Executor, QueryExecutor},
    output::{
        OutputOptions, format_execution, format_security_summary, format_test_cases,
        format_test_results, format_validation, format_vulnerabilities
    },
    report::{Report, ReportBuilder},
    runner::{TestRunner, run_cases},
    security::{InjectionScanner, summarize},
    validator::validate
};

/// Validate a query without running it.
pub fn run_validate(query: &str, opts: &OutputOptions) -> CommandOutput {
    let result = validate(query);
    CommandOutput::new(validation_exit_code(&result), format_validation(&result, opts))
}

/// Screen a query, optionally with the severity-aware assessment.
pub fn run_scan(query: &str, assess: bool, config: &Config, opts: &OutputOptions) -> CommandOutput {
    let scanner = InjectionScanner::with_config(config.security.clone());
    if assess {
        let summary = summarize(scanner.assess(query));
        CommandOutput::new(
            assessment_exit_code(&summary),
            format_security_summary(&summary, opts)
        )
    } else {
        let vulns = scanner.scan(query);
        CommandOutput::new(scan_exit_code(&vulns), format_vulnerabilities(&vulns, opts))
    }
}

/// Validate, then execute a query against the configured database.
///
/// Invalid queries are refused unless `skip_validation` is set. The
/// connection is closed before returning, whether execution failed or not.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the store rejects the
/// statement.
pub async fn run_execute(
    query: &str,
    skip_validation: bool,
    config: &Config,
    opts: &OutputOptions
) -> AppResult<CommandOutput> {
    if !skip_validation {
        let validation = validate(query);
        if !validation.is_valid {
            return Ok(CommandOutput::new(1, format_validation(&validation, opts)));
        }
    }

    let executor = Executor::connect(&config.database.uri()?).await?;
    let mut executor =
        DeadlineExecutor::new(executor, config.database.max_query_execution_time);
    let result = executor.execute(query).await;
    executor.inner_mut().close().await;

    let result = result?;
    Ok(CommandOutput::new(0, format_execution(&result, opts)))
}

/// List every loaded test case.
pub fn run_tests_list(config: &Config, opts: &OutputOptions) -> AppResult<CommandOutput> {
    let store = TestCaseStore::open(&config.tests.dir)?;
    let cases = store.load()?;
    Ok(CommandOutput::new(0, format_test_cases(&cases, opts)))
}

/// Save a new test case document.
pub fn run_tests_add(
    name: &str,
    query: &str,
    expected: &str,
    config: &Config
) -> AppResult<CommandOutput> {
    let expected = parse_expected_output(expected)?;
    let store = TestCaseStore::open(&config.tests.dir)?;
    let path = store.save(&TestCase::new(name, query, expected))?;
    let mut out = CommandOutput::new(0, format!("Saved test case to {}\n", path.display()));
    out.written.push(path);
    Ok(out)
}

/// Run all test cases, print results and write reports.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded, the database is
/// unreachable, or a report cannot be written. Failing cases are results,
/// not errors.
pub async fn run_tests(
    params: RunParams,
    config: &Config,
    opts: &OutputOptions
) -> AppResult<CommandOutput> {
    let runner = TestRunner::new(TestCaseStore::open(&config.tests.dir)?);
    let cases = runner.store().load()?;

    let pb = if params.progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Running {} test case(s)...", cases.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let executor = Executor::connect(&config.database.uri()?).await?;
    let mut executor =
        DeadlineExecutor::new(executor, config.database.max_query_execution_time);
    let results = run_cases(&cases, &mut executor).await;
    executor.inner_mut().close().await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = Report::new(results);
    let mut out = CommandOutput::new(
        run_exit_code(&report.summary),
        format_test_results(&report.test_results, &report.summary, opts)
    );

    if !params.no_report {
        let formats = if params.report_formats.is_empty() {
            config.report.formats.clone()
        } else {
            params.report_formats
        };
        let dir = params.report_dir.unwrap_or_else(|| config.report.dir.clone());
        let builder = ReportBuilder::new(dir)?;
        for format in formats {
            out.written.push(builder.write(&report, format)?);
        }
    }

    info!(
        total = report.summary.total_tests,
        passed = report.summary.passed_tests,
        "test run complete"
    );
    Ok(out)
}

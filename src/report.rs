//! Test run reports.
//!
//! A [`Report`] bundles a timestamp, the aggregate [`Summary`] and every
//! [`TestResult`] of one run. [`ReportBuilder`] persists it as JSON, YAML or
//! a standalone HTML page named `report_<YYYYmmdd_HHMMSS_micros>.<ext>`.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf}
};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{AppResult, file_write_error, report_error},
    runner::{TestResult, TestStatus}
};

/// Persisted report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Yaml,
    Html
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Html => "html"
        }
    }
}

/// Aggregate statistics over one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tests:            usize,
    pub passed_tests:           usize,
    pub failed_tests:           usize,
    pub error_tests:            usize,
    /// Percentage of passing cases, 0 for an empty run
    pub success_rate:           f64,
    /// Mean execution time of non-`ERROR` cases, 0 when there are none
    pub average_execution_time: f64
}

impl Summary {
    /// Compute counts, success rate and average time.
    ///
    /// # Example
    ///
    /// ```
    /// use sql_query_tester::report::Summary;
    ///
    /// let summary = Summary::from_results(&[]);
    /// assert_eq!(summary.total_tests, 0);
    /// assert_eq!(summary.success_rate, 0.0);
    /// assert_eq!(summary.average_execution_time, 0.0);
    /// ```
    pub fn from_results(results: &[TestResult]) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        let total_tests = results.len();
        let passed_tests = count(TestStatus::Pass);

        let timed: Vec<f64> = results
            .iter()
            .filter(|r| r.status != TestStatus::Error)
            .map(|r| r.execution_time)
            .collect();
        let average_execution_time = if timed.is_empty() {
            0.0
        } else {
            timed.iter().sum::<f64>() / timed.len() as f64
        };
        let success_rate = if total_tests == 0 {
            0.0
        } else {
            passed_tests as f64 / total_tests as f64 * 100.0
        };

        Self {
            total_tests,
            passed_tests,
            failed_tests: count(TestStatus::Fail),
            error_tests: count(TestStatus::Error),
            success_rate,
            average_execution_time
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed_tests == self.total_tests
    }
}

/// Report for one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// RFC 3339 local time of report creation
    pub timestamp:    String,
    pub summary:      Summary,
    pub test_results: Vec<TestResult>
}

impl Report {
    pub fn new(test_results: Vec<TestResult>) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            summary: Summary::from_results(&test_results),
            test_results
        }
    }
}

/// Writes reports into a directory
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    dir: PathBuf
}

impl ReportBuilder {
    /// Create the builder, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| file_write_error(&dir, e))?;
        Ok(Self {
            dir
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialize the report and write it, returning the file path.
    ///
    /// Existing reports are never replaced: a name collision within the same
    /// microsecond fails the write.
    pub fn write(&self, report: &Report, format: ReportFormat) -> AppResult<PathBuf> {
        let content = render(report, format)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
        let path = self
            .dir
            .join(format!("report_{}.{}", stamp, format.extension()));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| file_write_error(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| file_write_error(&path, e))?;
        info!(file = %path.display(), "report written");
        Ok(path)
    }
}

/// Render a report in the given format
pub fn render(report: &Report, format: ReportFormat) -> AppResult<String> {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| report_error(e.to_string()))
        }
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| report_error(e.to_string()))
        }
        ReportFormat::Html => Ok(render_html(report))
    }
}

fn render_html(report: &Report) -> String {
    let summary = &report.summary;
    let mut rows = String::new();
    for result in &report.test_results {
        let status = result.status.to_string();
        rows.push_str(&format!(
            "        <tr><td>{}</td><td><code>{}</code></td><td class=\"{}\">{}</td><td>{}</td><td>{:.4}</td></tr>\n",
            escape_html(&result.name),
            escape_html(&result.query),
            status.to_lowercase(),
            status,
            escape_html(result.error.as_deref().unwrap_or_default()),
            result.execution_time
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>SQL Test Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .summary {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
        .pass {{ color: green; }}
        .fail {{ color: red; }}
        .error {{ color: orange; }}
    </style>
</head>
<body>
    <h1>SQL Test Report</h1>
    <p>Generated {timestamp}</p>
    <div class="summary">
        <h2>Summary</h2>
        <p>Total Tests: {total}</p>
        <p>Passed: {passed}</p>
        <p>Failed: {failed}</p>
        <p>Errors: {errors}</p>
        <p>Success Rate: {rate:.2}%</p>
        <p>Average Execution Time: {avg:.2}s</p>
    </div>
    <h2>Test Results</h2>
    <table>
        <tr><th>Name</th><th>Query</th><th>Status</th><th>Error</th><th>Time (s)</th></tr>
{rows}    </table>
</body>
</html>
"#,
        timestamp = escape_html(&report.timestamp),
        total = summary.total_tests,
        passed = summary.passed_tests,
        failed = summary.failed_tests,
        errors = summary.error_tests,
        rate = summary.success_rate,
        avg = summary.average_execution_time,
        rows = rows
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
    out
}

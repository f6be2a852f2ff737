use colored::Colorize;
use serde::Serialize;

use crate::{
    cases::TestCase,
    executor::ExecutionResult,
    report::Summary,
    runner::{TestResult, TestStatus},
    security::{SecuritySummary, Severity, Vulnerability},
    validator::ValidationResult
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true
        }
    }
}

/// Test run output for serialization
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub results: &'a [TestResult],
    pub summary: &'a Summary
}

fn structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Text => None
    }
}

fn paint(text: &str, opts: &OutputOptions, style: fn(&str) -> colored::ColoredString) -> String {
    if opts.colored {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Format a validation result
pub fn format_validation(result: &ValidationResult, opts: &OutputOptions) -> String {
    if let Some(out) = structured(result, opts.format) {
        return out;
    }
    let mut output = String::new();
    let query_type = result
        .query_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    output.push_str(&format!("Query type: {}\n", query_type));
    if result.is_valid {
        output.push_str(&paint("Valid", opts, |s| s.green().bold()));
        output.push('\n');
    } else {
        output.push_str(&paint("Invalid", opts, |s| s.red().bold()));
        output.push('\n');
        for issue in &result.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }
    output
}

/// Format an execution result
pub fn format_execution(result: &ExecutionResult, opts: &OutputOptions) -> String {
    if let Some(out) = structured(result, opts.format) {
        return out;
    }
    match result {
        ExecutionResult::Affected {
            affected_rows
        } => format!("{} row(s) affected\n", affected_rows),
        ExecutionResult::Rows(rows) if rows.is_empty() => "(no rows)\n".to_string(),
        ExecutionResult::Rows(rows) => {
            let mut output = String::new();
            let header: Vec<&str> = rows[0].keys().map(|k| k.as_str()).collect();
            output.push_str(&paint(&header.join(" | "), opts, |s| s.cyan().bold()));
            output.push('\n');
            for row in rows {
                let cells: Vec<String> = row
                    .values()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string()
                    })
                    .collect();
                output.push_str(&cells.join(" | "));
                output.push('\n');
            }
            output.push_str(&format!("({} row(s))\n", rows.len()));
            output
        }
    }
}

/// Format a list of findings
pub fn format_vulnerabilities(vulns: &[Vulnerability], opts: &OutputOptions) -> String {
    if let Some(out) = structured(vulns, opts.format) {
        return out;
    }
    if vulns.is_empty() {
        return paint("No vulnerabilities found", opts, |s| s.green().bold()) + "\n";
    }
    let mut output = String::new();
    for vuln in vulns {
        output.push_str(&format_finding(vuln, opts));
    }
    output.push_str(&format!("\n{} finding(s)\n", vulns.len()));
    output
}

fn format_finding(vuln: &Vulnerability, opts: &OutputOptions) -> String {
    let label = match vuln.severity {
        Some(severity) => format!("[{}] {}", severity, vuln.kind),
        None => format!("[{}]", vuln.kind)
    };
    let label = match vuln.severity {
        Some(Severity::High) => paint(&label, opts, |s| s.red().bold()),
        Some(Severity::Medium) => paint(&label, opts, |s| s.yellow().bold()),
        Some(Severity::Low) => paint(&label, opts, |s| s.blue()),
        None => paint(&label, opts, |s| s.magenta().bold())
    };
    format!("{} {}\n", label, vuln.description)
}

/// Format a security summary
pub fn format_security_summary(summary: &SecuritySummary, opts: &OutputOptions) -> String {
    if let Some(out) = structured(summary, opts.format) {
        return out;
    }
    let mut output = String::new();
    let header = "=== Security Assessment ===";
    output.push_str(&paint(header, opts, |s| s.bold()));
    output.push_str("\n\n");
    for vuln in &summary.vulnerabilities {
        output.push_str(&format_finding(vuln, opts));
    }
    if !summary.vulnerabilities.is_empty() {
        output.push('\n');
    }
    let breakdown = &summary.severity_breakdown;
    output.push_str(&format!(
        "Total: {} (high: {}, medium: {}, low: {})\n",
        summary.total_vulnerabilities, breakdown.high, breakdown.medium, breakdown.low
    ));
    if summary.is_secure {
        output.push_str(&paint("Secure", opts, |s| s.green().bold()));
    } else {
        output.push_str(&paint("Not secure", opts, |s| s.red().bold()));
    }
    output.push('\n');
    output
}

/// Format loaded test cases
pub fn format_test_cases(cases: &[TestCase], opts: &OutputOptions) -> String {
    if let Some(out) = structured(cases, opts.format) {
        return out;
    }
    if cases.is_empty() {
        return "No test cases found\n".to_string();
    }
    let mut output = String::new();
    for (i, case) in cases.iter().enumerate() {
        let header = format!("#{} {}", i + 1, case.name);
        output.push_str(&paint(&header, opts, |s| s.cyan().bold()));
        output.push('\n');
        output.push_str(&format!("  query:    {}\n", case.query));
        output.push_str(&format!("  expected: {}\n", case.expected_output));
    }
    output
}

/// Format test results followed by the run summary
pub fn format_test_results(results: &[TestResult], summary: &Summary, opts: &OutputOptions) -> String {
    if let Some(out) = structured(
        &RunOutput {
            results,
            summary
        },
        opts.format
    ) {
        return out;
    }
    let mut output = String::new();
    for result in results {
        let status = format!("{:<5}", result.status.to_string());
        let status = match result.status {
            TestStatus::Pass => paint(&status, opts, |s| s.green().bold()),
            TestStatus::Fail => paint(&status, opts, |s| s.red().bold()),
            TestStatus::Error => paint(&status, opts, |s| s.yellow().bold()),
            TestStatus::Pending => status
        };
        output.push_str(&format!(
            "{} {} ({:.3}s)\n",
            status, result.name, result.execution_time
        ));
        if let Some(error) = &result.error {
            output.push_str(&format!("      {}\n", error));
        }
    }
    output.push('\n');
    output.push_str(&format_summary(summary, opts));
    output
}

fn format_summary(summary: &Summary, opts: &OutputOptions) -> String {
    let line = format!(
        "{} total, {} passed, {} failed, {} errors | success rate {:.2}% | avg {:.3}s\n",
        summary.total_tests,
        summary.passed_tests,
        summary.failed_tests,
        summary.error_tests,
        summary.success_rate,
        summary.average_execution_time
    );
    if summary.all_passed() {
        paint(&line, opts, |s| s.green())
    } else {
        paint(&line, opts, |s| s.red())
    }
}

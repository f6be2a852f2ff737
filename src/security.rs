//! Injection screening for raw SQL text.
//!
//! The scanner never parses SQL. Detection is a list of pluggable rule
//! objects implementing [`Rule`], each looking at the raw query text:
//!
//! | ID | Rule | Mode | Finding |
//! |----|------|------|---------|
//! | INJ001 | Exact signature match | scan, assess (HIGH) | `SQL_INJECTION` |
//! | INJ002 | Odd single-quote count | scan | `UNESCAPED_QUOTES` |
//! | INJ003 | Dangerous keyword | scan | `DANGEROUS_OPERATION` |
//! | INJ004 | Structural regex | assess (HIGH) | `SQL_INJECTION` |
//! | INJ005 | No placeholders | assess (MEDIUM) | `PARAMETERIZATION` |
//! | INJ006 | Sensitive keyword | assess (HIGH) | `SENSITIVE_DATA` |
//!
//! Findings come back in rule order and are never de-duplicated, so the
//! same clause may be reported by an exact signature and a regex.
//!
//! # Example
//!
//! ```
//! use sql_query_tester::security::{InjectionScanner, VulnerabilityType};
//!
//! let scanner = InjectionScanner::new();
//! let found = scanner.scan("SELECT * FROM users WHERE name = '' OR '1'='1'");
//!
//! assert_eq!(found[0].kind, VulnerabilityType::SqlInjection);
//! assert_eq!(found[0].pattern.as_deref(), Some("' OR '1'='1"));
//! ```

pub mod rules;
mod types;

use tracing::debug;
pub use types::{
    RuleInfo, SecuritySummary, Severity, SeverityBreakdown, Vulnerability, VulnerabilityType
};

use crate::config::SecurityConfig;

/// Signatures checked verbatim when none are configured
pub const DEFAULT_INJECTION_PATTERNS: [&str; 5] = [
    "' OR '1'='1",
    "'; DROP TABLE users; --",
    "' UNION SELECT * FROM users; --",
    "1' OR '1'='1",
    "1; DROP TABLE users; --"
];

/// A single detection rule.
///
/// Rules look at raw query text and return every finding they make, or an
/// empty vector. They must never panic: the scanner runs on untrusted input.
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Checks the query and returns any findings.
    fn check(&self, query: &str) -> Vec<Vulnerability>;
}

/// Rule-based injection scanner with a plain and a severity-aware mode
pub struct InjectionScanner {
    scan_rules:   Vec<Box<dyn Rule>>,
    assess_rules: Vec<Box<dyn Rule>>
}

impl Default for InjectionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionScanner {
    /// Scanner with the default signatures and every rule enabled
    pub fn new() -> Self {
        Self::with_config(SecurityConfig::default())
    }

    /// Scanner with custom signatures and every rule enabled
    pub fn with_signatures<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self::with_config(SecurityConfig {
            injection_patterns: signatures.into_iter().map(Into::into).collect(),
            ..Default::default()
        })
    }

    /// Create a scanner from configuration
    ///
    /// # Notes
    ///
    /// - Rules whose id appears in `disabled` are dropped from both modes
    /// - Signature order is kept, so findings follow configuration order
    pub fn with_config(config: SecurityConfig) -> Self {
        let mut scan_rules: Vec<Box<dyn Rule>> = Vec::new();
        let mut assess_rules: Vec<Box<dyn Rule>> = Vec::new();

        for signature in &config.injection_patterns {
            scan_rules.push(Box::new(rules::SignatureMatch::new(signature.as_str(), None)));
            assess_rules.push(Box::new(rules::SignatureMatch::new(
                signature.as_str(),
                Some(Severity::High)
            )));
        }
        scan_rules.push(Box::new(rules::UnescapedQuotes));
        scan_rules.push(Box::new(rules::DangerousOperation));

        for pattern in rules::StructuralPattern::defaults() {
            assess_rules.push(Box::new(pattern));
        }
        assess_rules.push(Box::new(rules::MissingParameterization));
        assess_rules.push(Box::new(rules::SensitiveData));

        let enabled = |rule: &Box<dyn Rule>| {
            !config
                .disabled
                .iter()
                .any(|d| d.eq_ignore_ascii_case(rule.info().id))
        };
        scan_rules.retain(enabled);
        assess_rules.retain(enabled);

        Self {
            scan_rules,
            assess_rules
        }
    }

    /// Screen a query with signatures, quote balance and dangerous keywords
    pub fn scan(&self, query: &str) -> Vec<Vulnerability> {
        let found = run_rules(&self.scan_rules, query);
        debug!(findings = found.len(), "scan finished");
        found
    }

    /// Severity-aware screening: signatures, structural regexes,
    /// parameterization and sensitive data
    pub fn assess(&self, query: &str) -> Vec<Vulnerability> {
        let found = run_rules(&self.assess_rules, query);
        debug!(findings = found.len(), "assessment finished");
        found
    }

    /// Number of rules active in each mode as `(scan, assess)`
    pub fn rules_count(&self) -> (usize, usize) {
        (self.scan_rules.len(), self.assess_rules.len())
    }
}

fn run_rules(rules: &[Box<dyn Rule>], query: &str) -> Vec<Vulnerability> {
    rules.iter().flat_map(|rule| rule.check(query)).collect()
}

/// Reduce findings to per-severity counts.
///
/// Findings without a severity count toward the total but no bucket.
///
/// # Example
///
/// ```
/// use sql_query_tester::security::{InjectionScanner, summarize};
///
/// let scanner = InjectionScanner::new();
/// let summary = summarize(scanner.assess("SELECT password FROM users"));
///
/// assert!(!summary.is_secure);
/// assert_eq!(summary.severity_breakdown.high, 1);
/// assert_eq!(summary.severity_breakdown.medium, 1);
/// ```
pub fn summarize(vulnerabilities: Vec<Vulnerability>) -> SecuritySummary {
    let mut severity_breakdown = SeverityBreakdown::default();
    for severity in vulnerabilities.iter().filter_map(|v| v.severity) {
        severity_breakdown.record(severity);
    }
    SecuritySummary {
        total_vulnerabilities: vulnerabilities.len(),
        severity_breakdown,
        is_secure: vulnerabilities.is_empty(),
        vulnerabilities
    }
}

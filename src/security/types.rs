//! Type definitions for the injection scanner.
//!
//! - [`Severity`] - Finding severity (Low, Medium, High)
//! - [`VulnerabilityType`] - What kind of risk a finding describes
//! - [`Vulnerability`] - A single finding
//! - [`SeverityBreakdown`] / [`SecuritySummary`] - Aggregated view

use serde::Serialize;

/// Severity of a finding.
///
/// Ordered from lowest to highest so the worst finding can be picked with
/// `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH")
        }
    }
}

/// Kind of risk a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityType {
    SqlInjection,
    UnescapedQuotes,
    DangerousOperation,
    Parameterization,
    SensitiveData
}

impl std::fmt::Display for VulnerabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SqlInjection => write!(f, "SQL_INJECTION"),
            Self::UnescapedQuotes => write!(f, "UNESCAPED_QUOTES"),
            Self::DangerousOperation => write!(f, "DANGEROUS_OPERATION"),
            Self::Parameterization => write!(f, "PARAMETERIZATION"),
            Self::SensitiveData => write!(f, "SENSITIVE_DATA")
        }
    }
}

/// A single scanner finding.
///
/// Findings are independent: overlapping rules may report the same clause
/// more than once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vulnerability {
    #[serde(rename = "type")]
    pub kind:        VulnerabilityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity:    Option<Severity>,
    /// Signature or regex that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern:     Option<String>,
    /// Dangerous keyword that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation:   Option<String>,
    pub description: String
}

impl Vulnerability {
    pub fn new(kind: VulnerabilityType, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity: None,
            pattern: None,
            operation: None,
            description: description.into()
        }
    }

    pub fn with_severity(mut self, severity: Option<Severity>) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

/// Finding counts per severity; every bucket starts at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SeverityBreakdown {
    pub high:   usize,
    pub medium: usize,
    pub low:    usize
}

impl SeverityBreakdown {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low
        }
    }
}

/// Aggregated scanner output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySummary {
    pub total_vulnerabilities: usize,
    pub severity_breakdown:    SeverityBreakdown,
    pub vulnerabilities:       Vec<Vulnerability>,
    pub is_secure:             bool
}

impl SecuritySummary {
    /// Highest severity among the findings
    pub fn worst(&self) -> Option<Severity> {
        self.vulnerabilities.iter().filter_map(|v| v.severity).max()
    }
}

/// Metadata about a scanner rule
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "INJ001")
    pub id:   &'static str,
    /// Human-readable rule name
    pub name: &'static str
}

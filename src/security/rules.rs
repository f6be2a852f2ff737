use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Rule, RuleInfo, Severity, Vulnerability, VulnerabilityType};

/// Keywords reported by [`DangerousOperation`], in reporting order
pub const DANGEROUS_OPERATIONS: [&str; 4] = ["DROP", "TRUNCATE", "DELETE FROM", "UPDATE"];

/// Structural injection signatures, matched case-insensitively
pub const STRUCTURAL_PATTERNS: [&str; 10] = [
    r"'.*OR.*'1'='1",
    r"'.*UNION.*SELECT",
    r"'.*DROP.*TABLE",
    r"'.*DELETE.*FROM",
    r"'.*UPDATE.*SET",
    r"'.*INSERT.*INTO",
    r"'.*EXEC.*",
    r"'.*EXECUTE.*",
    r"'.*WAITFOR.*DELAY",
    r"'.*SLEEP.*"
];

/// Keywords hinting that a query touches sensitive data
pub const SENSITIVE_KEYWORDS: [&str; 7] = [
    "password",
    "credit_card",
    "ssn",
    "social_security",
    "secret",
    "api_key",
    "token"
];

/// Named (`:name`), positional (`?`), printf (`%s`) and `@name` placeholders
static PLACEHOLDER_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r":\w+", r"\?", r"%s", r"@\w+"]
        .into_iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

/// Literal injection signature found verbatim in the query.
///
/// No escaping or normalization happens, so a signature sitting inside a
/// correctly quoted literal still matches.
pub struct SignatureMatch {
    signature: String,
    severity:  Option<Severity>
}

impl SignatureMatch {
    pub fn new(signature: impl Into<String>, severity: Option<Severity>) -> Self {
        Self {
            signature: signature.into(),
            severity
        }
    }
}

impl Rule for SignatureMatch {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ001",
            name: "Injection signature"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        if !query.contains(&self.signature) {
            return vec![];
        }
        vec![
            Vulnerability::new(
                VulnerabilityType::SqlInjection,
                format!(
                    "Query contains potential SQL injection pattern: {}",
                    self.signature
                )
            )
            .with_severity(self.severity)
            .with_pattern(self.signature.as_str()),
        ]
    }
}

/// Odd number of single quotes: some literal is left open
pub struct UnescapedQuotes;

impl Rule for UnescapedQuotes {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ002",
            name: "Unescaped quotes"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        let quotes = query.matches('\'').count();
        if quotes % 2 == 0 {
            return vec![];
        }
        vec![Vulnerability::new(
            VulnerabilityType::UnescapedQuotes,
            "Query contains unescaped quotes"
        )]
    }
}

/// Destructive keywords anywhere in the text, one finding per keyword
pub struct DangerousOperation;

impl Rule for DangerousOperation {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ003",
            name: "Dangerous operation"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        let upper = query.to_uppercase();
        DANGEROUS_OPERATIONS
            .iter()
            .filter(|op| upper.contains(*op))
            .map(|op| {
                Vulnerability::new(
                    VulnerabilityType::DangerousOperation,
                    format!("Query contains dangerous operation: {}", op)
                )
                .with_operation(*op)
            })
            .collect()
    }
}

/// Case-insensitive regex signature, always high severity
pub struct StructuralPattern {
    regex: Regex
}

impl StructuralPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            regex
        })
    }

    /// One rule per entry of [`STRUCTURAL_PATTERNS`]
    pub fn defaults() -> Vec<Self> {
        STRUCTURAL_PATTERNS
            .iter()
            .map(|p| Self::new(p).expect("valid regex"))
            .collect()
    }
}

impl Rule for StructuralPattern {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ004",
            name: "Structural injection pattern"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        if !self.regex.is_match(query) {
            return vec![];
        }
        let pattern = self.regex.as_str();
        vec![
            Vulnerability::new(
                VulnerabilityType::SqlInjection,
                format!("Query matches common SQL injection pattern: {}", pattern)
            )
            .with_severity(Some(Severity::High))
            .with_pattern(pattern),
        ]
    }
}

/// Query inlines its values instead of using placeholders
pub struct MissingParameterization;

impl MissingParameterization {
    pub fn is_parameterized(query: &str) -> bool {
        PLACEHOLDER_REGEXES.iter().any(|re| re.is_match(query))
    }
}

impl Rule for MissingParameterization {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ005",
            name: "Missing parameterization"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        if Self::is_parameterized(query) {
            return vec![];
        }
        vec![
            Vulnerability::new(
                VulnerabilityType::Parameterization,
                "Query does not use parameterized statements"
            )
            .with_severity(Some(Severity::Medium)),
        ]
    }
}

/// Sensitive keyword anywhere in the text, column names included
pub struct SensitiveData;

impl SensitiveData {
    pub fn mentions_sensitive_data(query: &str) -> bool {
        let lower = query.to_lowercase();
        SENSITIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }
}

impl Rule for SensitiveData {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:   "INJ006",
            name: "Sensitive data exposure"
        }
    }

    fn check(&self, query: &str) -> Vec<Vulnerability> {
        if !Self::mentions_sensitive_data(query) {
            return vec![];
        }
        vec![
            Vulnerability::new(
                VulnerabilityType::SensitiveData,
                "Query may expose sensitive data"
            )
            .with_severity(Some(Severity::High)),
        ]
    }
}

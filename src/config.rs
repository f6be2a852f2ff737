//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables (a `.env` file in the working directory is read
//!    first)
//! 3. `.sql-tester.toml` in current directory
//! 4. `~/.config/sql-tester/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [database]
//! url = "sqlite://test_db.db"     # wins over the parts below when set
//! type = "sqlite"                 # sqlite, postgresql, mysql
//! host = "localhost"
//! port = 5432
//! name = "test_db"
//! user = ""
//! password = ""
//! max_query_execution_time = 5.0
//!
//! [tests]
//! dir = "tests/test_cases"
//!
//! [security]
//! injection_patterns = ["' OR '1'='1"]
//! disabled = ["INJ005"]
//!
//! [report]
//! dir = "reports"
//! formats = ["json", "yaml", "html"]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `DATABASE_URL` | Full connection URL |
//! | `DB_TYPE` | `sqlite`, `postgresql` or `mysql` |
//! | `DB_HOST` / `DB_PORT` / `DB_NAME` | Server location and database |
//! | `DB_USER` / `DB_PASSWORD` | Credentials |
//! | `MAX_QUERY_EXECUTION_TIME` | Per-query deadline in seconds |
//! | `TEST_CASES_DIR` | Directory holding test case documents |
//! | `REPORT_DIR` | Directory receiving reports |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::{
    error::{AppResult, config_error},
    report::ReportFormat,
    security::DEFAULT_INJECTION_PATTERNS
};

/// Default per-query deadline in seconds
pub const DEFAULT_MAX_QUERY_EXECUTION_TIME: f64 = 5.0;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tests:    TestsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub report:   ReportConfig
}

/// Backing store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url:                      Option<String>,
    #[serde(rename = "type")]
    pub db_type:                  String,
    pub host:                     String,
    pub port:                     u16,
    pub name:                     String,
    pub user:                     String,
    pub password:                 String,
    pub max_query_execution_time: f64
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url:                      None,
            db_type:                  String::from("sqlite"),
            host:                     String::from("localhost"),
            port:                     5432,
            name:                     String::from("test_db"),
            user:                     String::new(),
            password:                 String::new(),
            max_query_execution_time: DEFAULT_MAX_QUERY_EXECUTION_TIME
        }
    }
}

impl DatabaseConfig {
    /// Connection URL: the explicit `url` if set, otherwise built from parts.
    ///
    /// Unsupported database types fall back to SQLite with a warning.
    /// Credentials and the database name are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid URL host.
    ///
    /// # Example
    ///
    /// ```
    /// use sql_query_tester::config::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::default();
    /// assert_eq!(config.uri().unwrap(), "sqlite://test_db.db");
    /// ```
    pub fn uri(&self) -> AppResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        match self.db_type.trim().to_lowercase().as_str() {
            "sqlite" => Ok(self.sqlite_uri()),
            "postgresql" | "postgres" => self.server_uri("postgres"),
            "mysql" => self.server_uri("mysql"),
            other => {
                warn!(db_type = other, "unsupported database type, defaulting to SQLite");
                Ok(self.sqlite_uri())
            }
        }
    }

    fn sqlite_uri(&self) -> String {
        format!("sqlite://{}.db", self.name)
    }

    fn server_uri(&self, scheme: &str) -> AppResult<String> {
        let rejected = |part: &str| config_error(format!("Invalid database {} for {}", part, scheme));
        let mut url = Url::parse(&format!("{}://localhost", scheme))
            .map_err(|e| config_error(format!("Invalid database URL: {}", e)))?;
        url.set_host(Some(&self.host))
            .map_err(|e| config_error(format!("Invalid database host '{}': {}", self.host, e)))?;
        url.set_port(Some(self.port)).map_err(|_| rejected("port"))?;
        if !self.user.is_empty() {
            url.set_username(&self.user).map_err(|_| rejected("user"))?;
        }
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| rejected("password"))?;
        }
        url.path_segments_mut()
            .map_err(|_| rejected("name"))?
            .push(&self.name);
        Ok(url.into())
    }
}

/// Test case storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestsConfig {
    pub dir: PathBuf
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tests/test_cases")
        }
    }
}

/// Injection scanner configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Literal signatures checked verbatim
    pub injection_patterns: Vec<String>,
    /// Disabled rule IDs
    pub disabled:           Vec<String>
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            injection_patterns: DEFAULT_INJECTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            disabled:           Vec::new()
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub dir:     PathBuf,
    pub formats: Vec<ReportFormat>
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir:     PathBuf::from("reports"),
            formats: vec![ReportFormat::Json, ReportFormat::Yaml, ReportFormat::Html]
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (after reading `.env`)
    /// 2. Config file in current directory (.sql-tester.toml)
    /// 3. Config file in home directory (~/.config/sql-tester/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-tester")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-tester.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn from_file(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the raw value of a variable, which keeps this
    /// testable without touching the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let db = &mut self.database;
        if let Some(url) = lookup("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(db_type) = lookup("DB_TYPE") {
            db.db_type = db_type.trim().to_lowercase();
        }
        if let Some(host) = lookup("DB_HOST") {
            db.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            match port.trim().parse() {
                Ok(port) => db.port = port,
                Err(_) => warn!(value = %port, "invalid DB_PORT, keeping {}", db.port)
            }
        }
        if let Some(name) = lookup("DB_NAME") {
            db.name = name;
        }
        if let Some(user) = lookup("DB_USER") {
            db.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            db.password = password;
        }
        if let Some(raw) = lookup("MAX_QUERY_EXECUTION_TIME") {
            db.max_query_execution_time = parse_seconds(&raw).unwrap_or_else(|| {
                warn!(
                    value = %raw,
                    "invalid MAX_QUERY_EXECUTION_TIME, defaulting to {} seconds",
                    DEFAULT_MAX_QUERY_EXECUTION_TIME
                );
                DEFAULT_MAX_QUERY_EXECUTION_TIME
            });
        }
        if let Some(dir) = lookup("TEST_CASES_DIR") {
            self.tests.dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("REPORT_DIR") {
            self.report.dir = PathBuf::from(dir);
        }
    }
}

/// Parse a seconds value, ignoring a trailing `# comment`.
///
/// Returns `None` for anything that is not a finite, non-negative number.
///
/// # Example
///
/// ```
/// use sql_query_tester::config::parse_seconds;
///
/// assert_eq!(parse_seconds(" 2.5 # two and a half"), Some(2.5));
/// assert_eq!(parse_seconds("soon"), None);
/// ```
pub fn parse_seconds(raw: &str) -> Option<f64> {
    let value = raw.split('#').next().unwrap_or_default().trim();
    let seconds: f64 = value.parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

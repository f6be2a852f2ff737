use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SQL Query Tester - Validate, execute and screen SQL, run declarative test cases
#[derive(Parser, Debug)]
#[command(name = "sql-query-tester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    pub output_format: Format,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database connection URL (overrides configuration)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Directory holding test case documents (overrides configuration)
    #[arg(long, global = true)]
    pub cases_dir: Option<PathBuf>
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a query and report policy issues without running it
    Validate {
        /// SQL query text (use - for stdin)
        query: String
    },

    /// Validate and execute a query against the configured database
    Execute {
        /// SQL query text (use - for stdin)
        query: String,

        /// Execute even when validation reports issues
        #[arg(long)]
        skip_validation: bool
    },

    /// Screen a query for injection risk
    Scan {
        /// SQL query text (use - for stdin)
        query: String,

        /// Severity-aware assessment with a summary
        #[arg(long)]
        assess: bool
    },

    /// Manage and run declarative test cases
    Tests {
        #[command(subcommand)]
        command: TestsCommand
    }
}

#[derive(Subcommand, Debug)]
pub enum TestsCommand {
    /// List loaded test cases
    List,

    /// Run all test cases and write reports
    Run {
        /// Report formats to write (defaults to configuration)
        #[arg(long = "report-format", value_enum)]
        report_formats: Vec<ReportKind>,

        /// Directory receiving reports (overrides configuration)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Do not write report files
        #[arg(long)]
        no_report: bool
    },

    /// Save a new test case
    Add {
        /// Test case name
        #[arg(short, long)]
        name: String,

        /// SQL query to run
        #[arg(short, long)]
        query: String,

        /// Expected output as JSON
        #[arg(short, long)]
        expected: String
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKind {
    Json,
    Yaml,
    Html
}

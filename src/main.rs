//! # SQL Query Tester
//!
//! Validate, execute and screen SQL queries, and run declarative test cases
//! against a relational database.
//!
//! # Quick Start
//!
//! ```bash
//! # Classify a query and report policy issues
//! sql-query-tester validate "SELECT * FROM users"
//!
//! # Screen a query for injection risk
//! sql-query-tester scan "SELECT * FROM users WHERE id = 1 OR 1=1"
//! sql-query-tester scan --assess "SELECT password FROM users"
//!
//! # Execute against the configured database
//! sql-query-tester --database-url sqlite://app.db execute "SELECT 1 AS one"
//!
//! # Stream a query from stdin
//! echo "SELECT 1" | sql-query-tester validate -
//!
//! # Test cases
//! sql-query-tester tests add -n one -q "SELECT 1 AS one" -e '[{"one": 1}]'
//! sql-query-tester tests run --report-format json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`DATABASE_URL`, `DB_TYPE`, `DB_HOST`, `DB_PORT`,
//!    `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `MAX_QUERY_EXECUTION_TIME`), also
//!    read from `.env`
//! 3. `.sql-tester.toml` in current directory
//! 4. `~/.config/sql-tester/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [database]
//! type = "postgresql"
//! host = "localhost"
//! port = 5432
//! name = "app"
//! user = "app"
//! max_query_execution_time = 5.0
//!
//! [tests]
//! dir = "tests/test_cases"
//!
//! [security]
//! disabled = ["INJ006"]
//!
//! [report]
//! dir = "reports"
//! formats = ["json", "html"]
//! ```
//!
//! # Exit Codes
//!
//! - `validate` - `0` valid, `1` invalid
//! - `execute` - `0` success, `1` refused or failed
//! - `scan` - `0` no findings, `1` findings
//! - `scan --assess` - `0` secure, `1` findings, `2` high severity findings
//! - `tests run` - `0` all passed, `1` otherwise

use std::process;

use clap::Parser;
use sql_query_tester::{app::dispatch, cli::Cli, config::Config, logging::init_logging};
use tokio::main;

#[main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match Config::load() {
        Ok(config) => dispatch(cli, config).await,
        Err(e) => Err(e)
    };

    match result {
        Ok(out) => {
            print!("{}", out.output);
            if !out.output.is_empty() && !out.output.ends_with('\n') {
                println!();
            }
            process::exit(out.exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

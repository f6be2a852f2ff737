//! Application logic for the SQL Query Tester CLI.
//!
//! This module contains the command handlers separated from the main entry
//! point to enable testing. [`dispatch`] maps a parsed [`Cli`] onto the
//! handlers.

mod commands;
mod convert;
mod deadline;
mod helpers;
mod types;

pub use commands::{run_execute, run_scan, run_tests, run_tests_add, run_tests_list, run_validate};
pub use convert::{convert_format, convert_report_kind, create_output_options};
pub use deadline::DeadlineExecutor;
pub use helpers::{
    apply_global_overrides, assessment_exit_code, parse_expected_output, read_query_input,
    run_exit_code, scan_exit_code, validation_exit_code
};
pub use types::{CommandOutput, RunParams};

use crate::{
    cli::{Cli, Commands, TestsCommand},
    config::Config,
    error::AppResult
};

/// Run the command described by `cli` with the loaded configuration.
///
/// # Errors
///
/// Propagates handler errors: unreadable input, unreachable database,
/// malformed test case documents, unwritable reports.
pub async fn dispatch(cli: Cli, config: Config) -> AppResult<CommandOutput> {
    let opts = create_output_options(cli.global.output_format, cli.global.no_color);
    let config = apply_global_overrides(config, &cli.global);

    match cli.command {
        Commands::Validate {
            query
        } => Ok(run_validate(&read_query_input(&query)?, &opts)),
        Commands::Execute {
            query,
            skip_validation
        } => run_execute(&read_query_input(&query)?, skip_validation, &config, &opts).await,
        Commands::Scan {
            query,
            assess
        } => Ok(run_scan(&read_query_input(&query)?, assess, &config, &opts)),
        Commands::Tests {
            command
        } => match command {
            TestsCommand::List => run_tests_list(&config, &opts),
            TestsCommand::Run {
                report_formats,
                report_dir,
                no_report
            } => {
                let params = RunParams {
                    report_formats: report_formats.into_iter().map(convert_report_kind).collect(),
                    report_dir,
                    no_report,
                    progress: opts.colored
                };
                run_tests(params, &config, &opts).await
            }
            TestsCommand::Add {
                name,
                query,
                expected
            } => run_tests_add(&name, &query, &expected, &config)
        }
    }
}

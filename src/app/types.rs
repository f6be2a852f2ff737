//! Application types for CLI commands.

use std::path::PathBuf;

use crate::report::ReportFormat;

/// Rendered command output with the process exit code.
///
/// # Fields
///
/// * `exit_code` - Process exit code for the command
/// * `output` - Text written to stdout
/// * `written` - Files produced as a side effect (reports, saved cases)
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub output:    String,
    pub written:   Vec<PathBuf>
}

impl CommandOutput {
    pub fn new(exit_code: i32, output: String) -> Self {
        Self {
            exit_code,
            output,
            written: Vec::new()
        }
    }
}

/// Parameters for the `tests run` command.
#[derive(Debug, Clone, Default)]
pub struct RunParams {
    /// Report formats; empty means use configuration
    pub report_formats: Vec<ReportFormat>,
    /// Report directory override
    pub report_dir:     Option<PathBuf>,
    /// Skip writing report files
    pub no_report:      bool,
    /// Show a progress spinner while running
    pub progress:       bool
}

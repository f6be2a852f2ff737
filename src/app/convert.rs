//! Type conversion functions for CLI to internal types.

use crate::{
    cli::{Format, ReportKind},
    output::{OutputFormat, OutputOptions},
    report::ReportFormat
};

/// Converts a CLI format enum to the internal output format type.
///
/// # Example
///
/// ```
/// use sql_query_tester::{app::convert_format, cli::Format, output::OutputFormat};
///
/// assert!(matches!(convert_format(Format::Yaml), OutputFormat::Yaml));
/// ```
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Converts a CLI report kind to the persisted report format.
pub fn convert_report_kind(kind: ReportKind) -> ReportFormat {
    match kind {
        ReportKind::Json => ReportFormat::Json,
        ReportKind::Yaml => ReportFormat::Yaml,
        ReportKind::Html => ReportFormat::Html
    }
}

/// Creates output options from CLI flags.
pub fn create_output_options(format: Format, no_color: bool) -> OutputOptions {
    OutputOptions {
        format:  convert_format(format),
        colored: !no_color
    }
}

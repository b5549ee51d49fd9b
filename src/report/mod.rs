//! Report module for coverage aggregation and export
//!
//! This module handles:
//! - Folding classification results into a coverage report
//! - Rendering the report on the console
//! - Exporting it as CSV, a styled spreadsheet, or markdown
//! - Naming the per-category output files

mod console;
mod coverage;
mod csv_export;
mod markdown;
mod traits;
mod xlsx_export;

pub use console::{format_console_report, print_report};
pub use coverage::{CoverageReport, ReportRow, NOT_CATEGORIZED};
pub use csv_export::CsvExporter;
pub use markdown::{format_markdown_report, MarkdownExporter};
pub use traits::{CategoryReport, ExportFormat, OutputError, OutputResult, ReportExporter};
pub use xlsx_export::{XlsxExporter, SUMMARY_TOP_LABELS};

use std::path::{Path, PathBuf};

/// Suffix appended to every report file stem
pub const REPORT_SUFFIX: &str = "_category_analysis";

/// Returns the exporter for a format
pub fn exporter_for(format: ExportFormat) -> Box<dyn ReportExporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Xlsx => Box::new(XlsxExporter),
        ExportFormat::Markdown => Box::new(MarkdownExporter),
    }
}

/// Turns a category name into a file-name-safe stem
///
/// Lowercases the name, collapses whitespace runs into `_`, and replaces any
/// remaining character outside `[a-z0-9_-]` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Path of the report file for a category
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use zia_category_analyzer::report::{report_path, ExportFormat};
///
/// let path = report_path(Path::new("out"), "Partner Sites", ExportFormat::Csv);
/// assert_eq!(path, Path::new("out/partner_sites_category_analysis.csv"));
/// ```
pub fn report_path(directory: &Path, category_name: &str, format: ExportFormat) -> PathBuf {
    directory.join(format!(
        "{}{}.{}",
        sanitize_file_stem(category_name),
        REPORT_SUFFIX,
        format.extension()
    ))
}

//! Report exporter traits and types
//!
//! This module defines the trait interface for report exporters and the
//! data handed to them for a single analyzed category.

use crate::report::coverage::CoverageReport;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File format of the per-category report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `url,categories` rows
    #[default]
    Csv,

    /// Styled workbook with a mapping sheet and a summary sheet
    Xlsx,

    /// Human-readable coverage summary
    Markdown,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Markdown => "md",
        }
    }

    pub fn all() -> [ExportFormat; 3] {
        [Self::Csv, Self::Xlsx, Self::Markdown]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "1" => Ok(Self::Csv),
            "xlsx" | "excel" | "2" => Ok(Self::Xlsx),
            "markdown" | "md" | "3" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown export format '{}' (expected csv, xlsx or markdown)",
                other
            )),
        }
    }
}

/// Everything an exporter needs about one analyzed category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category_id: String,
    pub category_name: String,
    pub coverage: CoverageReport,
    pub generated_at: DateTime<Utc>,
}

impl CategoryReport {
    pub fn new(
        category_id: impl Into<String>,
        category_name: impl Into<String>,
        coverage: CoverageReport,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            coverage,
            generated_at: Utc::now(),
        }
    }
}

/// Trait for report exporters
///
/// Exporters render one category report to a file. They hold no state
/// between categories.
pub trait ReportExporter {
    /// The format this exporter produces
    fn format(&self) -> ExportFormat;

    /// Writes the report to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `report` - The analyzed category
    /// * `path` - Destination file
    fn export(&self, report: &CategoryReport, path: &Path) -> OutputResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_format() {
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!(" XLSX ".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!("2".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for format in ExportFormat::all() {
            assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
        }
    }
}

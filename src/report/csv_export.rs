//! CSV export of the URL-to-category mapping

use crate::report::traits::{CategoryReport, ExportFormat, OutputResult, ReportExporter};
use std::path::Path;

/// Writes `url,categories` rows, header first
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl ReportExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, report: &CategoryReport, path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["url", "categories"])?;
        for row in &report.coverage.rows {
            writer.write_record([row.url.as_str(), row.categories.as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::Classification;
    use crate::report::CoverageReport;
    use tempfile::TempDir;

    #[test]
    fn test_csv_rows_in_result_order() {
        let coverage = CoverageReport::aggregate(&[
            Classification::new("b.com", ["News", "Sports"]),
            Classification::new("a.com", Vec::<String>::new()),
        ]);
        let report = CategoryReport::new("CUSTOM_01", "Partners", coverage);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partners_category_analysis.csv");
        CsvExporter.export(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "url,categories\nb.com,\"News, Sports\"\na.com,Not categorized\n"
        );
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let report = CategoryReport::new("CUSTOM_01", "Empty", CoverageReport::default());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        CsvExporter.export(&report, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "url,categories\n");
    }
}

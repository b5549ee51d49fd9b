//! Spreadsheet export
//!
//! Produces a workbook with two sheets: the full URL-to-category mapping and
//! a summary of the coverage statistics with the most frequent labels.

use crate::report::coverage::NOT_CATEGORIZED;
use crate::report::traits::{CategoryReport, ExportFormat, OutputResult, ReportExporter};
use rust_xlsxwriter::{Color, Format, FormatBorder, RowNum, Workbook, Worksheet};
use std::path::Path;

/// Number of labels listed on the summary sheet
pub const SUMMARY_TOP_LABELS: usize = 10;

const HEADER_FILL: u32 = 0x1F4E78;

/// Writes a styled `.xlsx` workbook
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl XlsxExporter {
    fn header_format() -> Format {
        Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_border(FormatBorder::Thin)
    }

    fn mapping_sheet(report: &CategoryReport) -> OutputResult<Worksheet> {
        let header = Self::header_format();
        let uncategorized = Format::new().set_italic().set_font_color(Color::Gray);

        let mut sheet = Worksheet::new();
        sheet.set_name("URL Mapping")?;
        sheet.write_string_with_format(0, 0, "URL", &header)?;
        sheet.write_string_with_format(0, 1, "Categories", &header)?;
        sheet.set_column_width(0, 60)?;
        sheet.set_column_width(1, 50)?;
        sheet.set_freeze_panes(1, 0)?;

        for (index, row) in report.coverage.rows.iter().enumerate() {
            let line = (index + 1) as RowNum;
            sheet.write_string(line, 0, row.url.as_str())?;
            if row.categories == NOT_CATEGORIZED {
                sheet.write_string_with_format(
                    line,
                    1,
                    row.categories.as_str(),
                    &uncategorized,
                )?;
            } else {
                sheet.write_string(line, 1, row.categories.as_str())?;
            }
        }

        Ok(sheet)
    }

    fn summary_sheet(report: &CategoryReport) -> OutputResult<Worksheet> {
        let header = Self::header_format();
        let label = Format::new().set_bold();
        let percent = Format::new().set_num_format("0.00\"%\"");
        let coverage = &report.coverage;

        let mut sheet = Worksheet::new();
        sheet.set_name("Summary")?;
        sheet.set_column_width(0, 40)?;
        sheet.set_column_width(1, 20)?;
        sheet.set_column_width(2, 14)?;

        sheet.write_string_with_format(0, 0, "Metric", &header)?;
        sheet.write_string_with_format(0, 1, "Value", &header)?;
        sheet.write_string_with_format(0, 2, "Percent", &header)?;

        sheet.write_string_with_format(1, 0, "Category", &label)?;
        sheet.write_string(1, 1, report.category_name.as_str())?;
        sheet.write_string_with_format(2, 0, "Category ID", &label)?;
        sheet.write_string(2, 1, report.category_id.as_str())?;
        sheet.write_string_with_format(3, 0, "Generated", &label)?;
        sheet.write_string(3, 1, report.generated_at.to_rfc3339())?;

        sheet.write_string_with_format(4, 0, "Total URLs", &label)?;
        sheet.write_number(4, 1, coverage.total as f64)?;
        sheet.write_string_with_format(5, 0, "Categorized URLs", &label)?;
        sheet.write_number(5, 1, coverage.categorized_count as f64)?;
        sheet.write_number_with_format(5, 2, coverage.percent_categorized(), &percent)?;
        sheet.write_string_with_format(6, 0, "Uncategorized URLs", &label)?;
        sheet.write_number(6, 1, coverage.uncategorized_count() as f64)?;
        sheet.write_number_with_format(6, 2, coverage.percent_uncategorized(), &percent)?;
        sheet.write_string_with_format(7, 0, "Distinct vendor categories", &label)?;
        sheet.write_number(7, 1, coverage.distinct_labels() as f64)?;

        let top_start: RowNum = 9;
        sheet.write_string_with_format(top_start, 0, "Top Vendor Categories", &header)?;
        sheet.write_string_with_format(top_start, 1, "URLs", &header)?;
        for (offset, (name, count)) in coverage
            .top_labels(SUMMARY_TOP_LABELS)
            .into_iter()
            .enumerate()
        {
            let line = top_start + 1 + offset as RowNum;
            sheet.write_string(line, 0, name)?;
            sheet.write_number(line, 1, count as f64)?;
        }

        Ok(sheet)
    }
}

impl ReportExporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn export(&self, report: &CategoryReport, path: &Path) -> OutputResult<()> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(Self::mapping_sheet(report)?);
        workbook.push_worksheet(Self::summary_sheet(report)?);
        workbook.save(path)?;
        Ok(())
    }
}

//! Markdown report generation
//!
//! This module generates a human-readable markdown summary of one category's
//! coverage, including statistics, uncategorized URLs, and the label breakdown.

use crate::report::traits::{CategoryReport, ExportFormat, OutputResult, ReportExporter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the coverage summary as a markdown document
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl ReportExporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn export(&self, report: &CategoryReport, path: &Path) -> OutputResult<()> {
        let markdown = format_markdown_report(report);

        let mut file = File::create(path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Escapes characters that would break a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Formats a category report as markdown
///
/// # Arguments
///
/// * `report` - The analyzed category
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CategoryReport) -> String {
    let coverage = &report.coverage;
    let mut md = String::new();

    md.push_str(&format!(
        "# Category Coverage: {}\n\n",
        report.category_name
    ));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Category ID**: {}\n", report.category_id));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        report.generated_at.to_rfc3339()
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", coverage.total));
    md.push_str(&format!(
        "- **Categorized**: {} ({:.2}%)\n",
        coverage.categorized_count,
        coverage.percent_categorized()
    ));
    md.push_str(&format!(
        "- **Not Categorized**: {} ({:.2}%)\n",
        coverage.uncategorized_count(),
        coverage.percent_uncategorized()
    ));
    md.push_str(&format!(
        "- **Distinct Vendor Categories**: {}\n\n",
        coverage.distinct_labels()
    ));

    if !coverage.label_counts.is_empty() {
        md.push_str("## Vendor Category Breakdown\n\n");
        md.push_str("| Category | URLs |\n");
        md.push_str("|----------|------|\n");

        for (label, count) in coverage.top_labels(usize::MAX) {
            md.push_str(&format!("| {} | {} |\n", cell(label), count));
        }
        md.push('\n');
    }

    if !coverage.uncategorized_urls.is_empty() {
        md.push_str("## URLs Not Categorized\n\n");
        for url in &coverage.uncategorized_urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !coverage.rows.is_empty() {
        md.push_str("## URL Mapping\n\n");
        md.push_str("| URL | Categories |\n");
        md.push_str("|-----|------------|\n");

        for row in &coverage.rows {
            md.push_str(&format!(
                "| {} | {} |\n",
                cell(&row.url),
                cell(&row.categories)
            ));
        }
        md.push('\n');
    }

    md
}

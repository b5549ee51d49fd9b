//! Console rendering of a category report
//!
//! Only a sample of the mapping is printed; the full mapping goes to the
//! exported file.

use crate::report::traits::CategoryReport;
use std::fmt::Write;

/// Uncategorized URLs listed before eliding the rest
pub const CONSOLE_UNCATEGORIZED_LIMIT: usize = 20;

/// Labels listed in the breakdown
pub const CONSOLE_TOP_LABELS: usize = 10;

/// Mapping rows shown in the sample table
pub const CONSOLE_SAMPLE_ROWS: usize = 7;

const TABLE_RULE: &str = "+----------------------------+------------------------------+";

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Renders the console view of a report
pub fn format_console_report(report: &CategoryReport) -> String {
    let coverage = &report.coverage;
    let mut out = String::new();

    let _ = writeln!(out, "Results:");
    let _ = writeln!(
        out,
        "  URLs found in vendor-defined categories: {} ({:.2}%)",
        coverage.categorized_count,
        coverage.percent_categorized()
    );
    let _ = writeln!(
        out,
        "  URLs NOT categorized by the vendor: {} ({:.2}%)",
        coverage.uncategorized_count(),
        coverage.percent_uncategorized()
    );

    if !coverage.uncategorized_urls.is_empty() {
        let _ = writeln!(out, "\nURLs not defined by the vendor:");
        for url in coverage
            .uncategorized_urls
            .iter()
            .take(CONSOLE_UNCATEGORIZED_LIMIT)
        {
            let _ = writeln!(out, "  - {}", url);
        }
        if coverage.uncategorized_count() > CONSOLE_UNCATEGORIZED_LIMIT {
            let _ = writeln!(
                out,
                "  ... and {} more",
                coverage.uncategorized_count() - CONSOLE_UNCATEGORIZED_LIMIT
            );
        }
    }

    if !coverage.label_counts.is_empty() {
        let _ = writeln!(out, "\nBreakdown by vendor category:");
        for (label, count) in coverage.top_labels(CONSOLE_TOP_LABELS) {
            let _ = writeln!(out, "  - {}: {} URLs", label, count);
        }
        if coverage.distinct_labels() > CONSOLE_TOP_LABELS {
            let _ = writeln!(
                out,
                "  ... and {} more categories",
                coverage.distinct_labels() - CONSOLE_TOP_LABELS
            );
        }
    }

    let _ = writeln!(out, "\nSample URL-to-category mapping:");
    let _ = writeln!(out, "{}", TABLE_RULE);
    let _ = writeln!(out, "| {:<26} | {:<28} |", "URL", "Vendor Category");
    let _ = writeln!(out, "{}", TABLE_RULE);
    for row in coverage.rows.iter().take(CONSOLE_SAMPLE_ROWS) {
        let _ = writeln!(
            out,
            "| {:<26} | {:<28} |",
            truncate(&row.url, 26),
            truncate(&row.categories, 28)
        );
    }
    if coverage.rows.len() > CONSOLE_SAMPLE_ROWS {
        let more = format!(
            "| ... ({} more entries)",
            coverage.rows.len() - CONSOLE_SAMPLE_ROWS
        );
        let _ = writeln!(out, "{:<60} |", more);
    }
    let _ = writeln!(out, "{}", TABLE_RULE);

    out
}

/// Prints the console view of a report to stdout
pub fn print_report(report: &CategoryReport) {
    print!("{}", format_console_report(report));
}

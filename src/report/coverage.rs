//! Coverage aggregation
//!
//! Folds per-URL classification results into the figures the reports show:
//! how many URLs the vendor categorizes, which ones it does not, and how
//! often each vendor label occurs.

use crate::lookup::Classification;
use std::collections::BTreeMap;

/// Row text for a URL without any vendor label
pub const NOT_CATEGORIZED: &str = "Not categorized";

/// One line of the URL-to-category mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub url: String,

    /// Labels joined with `", "`, or [`NOT_CATEGORIZED`]
    pub categories: String,
}

/// Aggregate coverage of one category's URLs
///
/// Built once from the classification results and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    /// Number of classified URLs
    pub total: usize,

    /// URLs carrying at least one label
    pub categorized_count: usize,

    /// URLs without labels, in result order
    pub uncategorized_urls: Vec<String>,

    /// Occurrences of each label across all URLs
    pub label_counts: BTreeMap<String, usize>,

    /// Mapping rows, in result order
    pub rows: Vec<ReportRow>,
}

impl CoverageReport {
    /// Aggregates classification results
    pub fn aggregate(results: &[Classification]) -> Self {
        let mut report = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results {
            let categories = if result.is_categorized() {
                report.categorized_count += 1;
                for label in &result.labels {
                    *report.label_counts.entry(label.clone()).or_insert(0) += 1;
                }
                result.labels.join(", ")
            } else {
                report.uncategorized_urls.push(result.url.clone());
                NOT_CATEGORIZED.to_string()
            };

            report.rows.push(ReportRow {
                url: result.url.clone(),
                categories,
            });
        }

        report
    }

    pub fn uncategorized_count(&self) -> usize {
        self.uncategorized_urls.len()
    }

    /// Share of categorized URLs in percent, two decimals; 0 for an empty report
    pub fn percent_categorized(&self) -> f64 {
        percentage(self.categorized_count, self.total)
    }

    /// Share of uncategorized URLs in percent, two decimals; 0 for an empty report
    pub fn percent_uncategorized(&self) -> f64 {
        percentage(self.uncategorized_count(), self.total)
    }

    /// Labels by descending count, ties broken alphabetically
    ///
    /// Returns at most `limit` entries.
    pub fn top_labels(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .label_counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Number of distinct labels seen
    pub fn distinct_labels(&self) -> usize {
        self.label_counts.len()
    }
}

/// `part / total * 100`, rounded to two decimals, with 0 when `total` is 0
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

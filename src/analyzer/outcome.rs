use crate::report::CategoryReport;
use std::path::PathBuf;

/// Result of analyzing one category
#[derive(Debug, Clone)]
pub enum CategoryOutcome {
    /// Report computed and exported
    Analyzed {
        report: CategoryReport,
        output_path: PathBuf,
    },

    /// The category holds no URLs; nothing was looked up or written
    Empty { id: String, name: String },

    /// An API or output error stopped this category
    Failed { id: String, error: String },
}

impl CategoryOutcome {
    /// Identifier of the category this outcome belongs to
    pub fn id(&self) -> &str {
        match self {
            Self::Analyzed { report, .. } => &report.category_id,
            Self::Empty { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Outcomes of a run, in analysis order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<CategoryOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: CategoryOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn analyzed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CategoryOutcome::Analyzed { .. }))
            .count()
    }

    pub fn empty_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CategoryOutcome::Empty { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// True when at least one category failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Category ids in the order they were processed
    pub fn ids(&self) -> Vec<&str> {
        self.outcomes.iter().map(CategoryOutcome::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CoverageReport;

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.push(CategoryOutcome::Analyzed {
            report: CategoryReport::new("C1", "One", CoverageReport::default()),
            output_path: PathBuf::from("one_category_analysis.csv"),
        });
        summary.push(CategoryOutcome::Empty {
            id: "C2".to_string(),
            name: "Two".to_string(),
        });
        summary.push(CategoryOutcome::Failed {
            id: "C3".to_string(),
            error: "HTTP 500".to_string(),
        });

        assert_eq!(summary.analyzed_count(), 1);
        assert_eq!(summary.empty_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert!(summary.has_failures());
        assert_eq!(summary.ids(), vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::default();
        assert_eq!(summary.failed_count(), 0);
        assert!(!summary.has_failures());
        assert!(summary.ids().is_empty());
    }
}

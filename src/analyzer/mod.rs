//! Analysis orchestration
//!
//! This module drives a full analysis run:
//! - Authenticating the API session
//! - Listing custom categories
//! - For each selected category: collecting its URLs, classifying them,
//!   aggregating coverage, and exporting the report
//! - Isolating per-category failures so one bad category does not stop the rest

mod outcome;

pub use outcome::{CategoryOutcome, RunSummary};

use crate::categories::{collect_urls, list_custom_categories, Category};
use crate::client::Gateway;
use crate::config::{Config, Credentials};
use crate::lookup::classify;
use crate::report::{
    exporter_for, print_report, report_path, CategoryReport, CoverageReport, ExportFormat,
    ReportExporter,
};
use crate::ZiaError;
use std::path::PathBuf;

/// Main analysis coordinator
pub struct Analyzer {
    gateway: Gateway,
    batch_size: usize,
    output_dir: PathBuf,
    exporter: Box<dyn ReportExporter>,
    echo_reports: bool,
}

impl Analyzer {
    /// Creates a new analyzer
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `credentials` - OAuth client credentials
    /// * `format` - Export format for the per-category reports
    ///
    /// # Returns
    ///
    /// * `Ok(Analyzer)` - Ready to authenticate
    /// * `Err(ZiaError)` - The HTTP client could not be built
    pub fn new(
        config: &Config,
        credentials: Credentials,
        format: ExportFormat,
    ) -> Result<Self, ZiaError> {
        Ok(Self {
            gateway: Gateway::new(config, credentials)?,
            batch_size: config.client.lookup_batch_size,
            output_dir: PathBuf::from(&config.output.directory),
            exporter: exporter_for(format),
            echo_reports: false,
        })
    }

    /// Prints each category's console report as it completes
    pub fn with_console_reports(mut self, enabled: bool) -> Self {
        self.echo_reports = enabled;
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.exporter.format()
    }

    /// Switches the export format for the categories analyzed next
    pub fn set_format(&mut self, format: ExportFormat) {
        self.exporter = exporter_for(format);
    }

    /// Obtains the first access token
    pub async fn authenticate(&mut self) -> Result<(), ZiaError> {
        tracing::info!("Authenticating with the identity service");
        self.gateway.authenticate().await?;
        tracing::info!("Authentication successful");
        Ok(())
    }

    /// Lists the tenant's custom categories
    pub async fn list_categories(&mut self) -> Result<Vec<Category>, ZiaError> {
        list_custom_categories(&mut self.gateway).await
    }

    /// Analyzes the given categories in order
    ///
    /// Per-category failures are recorded in the summary and the run moves on.
    /// An authentication failure stops the run and is returned as the error.
    pub async fn run(&mut self, category_ids: &[String]) -> Result<RunSummary, ZiaError> {
        tracing::info!("Analyzing {} categories", category_ids.len());

        let mut summary = RunSummary::default();
        for id in category_ids {
            match self.analyze_category(id).await {
                Ok(outcome) => summary.push(outcome),
                Err(e) if e.is_fatal() => {
                    tracing::error!("Authentication lost while analyzing {}: {}", id, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Error analyzing category {}: {}", id, e);
                    summary.push(CategoryOutcome::Failed {
                        id: id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Analysis complete: {} analyzed, {} empty, {} failed",
            summary.analyzed_count(),
            summary.empty_count(),
            summary.failed_count()
        );
        Ok(summary)
    }

    /// Analyzes a single category
    ///
    /// This method:
    /// 1. Collects the category's URL set
    /// 2. Classifies the URLs in batches
    /// 3. Aggregates coverage
    /// 4. Exports the report
    pub async fn analyze_category(&mut self, id: &str) -> Result<CategoryOutcome, ZiaError> {
        let collected = collect_urls(&mut self.gateway, id).await?;
        tracing::info!(
            "Analyzing category: {} (ID: {}), {} URLs",
            collected.name,
            id,
            collected.urls.len()
        );

        if collected.urls.is_empty() {
            tracing::info!("No URLs found in category {}", collected.name);
            return Ok(CategoryOutcome::Empty {
                id: id.to_string(),
                name: collected.name,
            });
        }

        let results = classify(&mut self.gateway, &collected.urls, self.batch_size).await?;
        let report = CategoryReport::new(id, collected.name, CoverageReport::aggregate(&results));

        if self.echo_reports {
            print_report(&report);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = report_path(&self.output_dir, &report.category_name, self.format());
        self.exporter.export(&report, &path)?;
        tracing::info!("Full URL-to-category mapping saved as: {}", path.display());

        Ok(CategoryOutcome::Analyzed {
            report,
            output_path: path,
        })
    }
}

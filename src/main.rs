//! ZIA Category Analyzer main entry point
//!
//! This is the command-line interface for the URL-category coverage reporter.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zia_category_analyzer::categories::{parse_selection, Category};
use zia_category_analyzer::config::resolve_config;
use zia_category_analyzer::{
    Analyzer, CategoryOutcome, Config, Credentials, ExportFormat, RunSummary,
};

/// ZIA Category Analyzer: URL-category coverage reporting
///
/// Lists the tenant's custom URL categories, looks up the vendor's own
/// classification of every URL they contain, and reports how much of each
/// category the vendor already covers.
#[derive(Parser, Debug)]
#[command(name = "zia-category-analyzer")]
#[command(version = "1.0.0")]
#[command(about = "URL-category coverage reporting for ZIA", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Categories to analyze: comma-separated 1-based numbers, or "all"
    #[arg(long, value_name = "SELECTION")]
    categories: Option<String>,

    /// Export format (csv, xlsx or markdown)
    #[arg(long, value_name = "FORMAT")]
    format: Option<ExportFormat>,

    /// Directory the reports are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// List custom categories and exit
    #[arg(long, conflicts_with = "dry_run")]
    list: bool,

    /// Validate config and credentials without contacting the API
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Could not read .env file: {}", e);
        }
    }

    let config = match resolve_config(cli.config.as_deref(), cli.output_dir.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let credentials = match Credentials::from_env() {
        Ok(creds) => creds,
        Err(e) => {
            tracing::error!("Failed to load credentials: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &credentials);
        return Ok(());
    }

    let format = cli.format.unwrap_or(config.output.format);
    let mut analyzer =
        Analyzer::new(&config, credentials, format)?.with_console_reports(!cli.quiet);
    analyzer.authenticate().await?;

    let categories = analyzer.list_categories().await?;
    if categories.is_empty() {
        println!("No custom URL categories found.");
        return Ok(());
    }

    print_categories(&categories);
    if cli.list {
        return Ok(());
    }

    let input = match &cli.categories {
        Some(selection) => selection.clone(),
        None => prompt("\nEnter category numbers to analyze (comma-separated) or 'all': ")?,
    };
    let selection = parse_selection(&input, categories.len());
    for rejected in &selection.rejected {
        tracing::warn!("Skipping selection: {}", rejected);
    }
    if selection.is_empty() {
        println!("No valid categories selected.");
        return Ok(());
    }

    let format = match cli.format {
        Some(format) => format,
        None if cli.categories.is_some() => config.output.format,
        None => prompt_format(config.output.format)?,
    };
    analyzer.set_format(format);

    let ids: Vec<String> = selection
        .indices
        .iter()
        .map(|&i| categories[i].id.clone())
        .collect();

    let summary = match analyzer.run(&ids).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Analysis aborted: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&summary);
    println!("\nAnalysis complete.");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("zia_category_analyzer=info,warn"),
            1 => EnvFilter::new("zia_category_analyzer=debug,info"),
            2 => EnvFilter::new("zia_category_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved settings, secrets redacted
fn handle_dry_run(config: &Config, credentials: &Credentials) {
    println!("=== ZIA Category Analyzer Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.api_base_url);
    println!("  Audience: {}", config.api.audience);
    println!("  Request timeout: {}s", config.api.request_timeout);

    println!("\nClient:");
    println!(
        "  Minimum request interval: {}ms",
        config.client.min_request_interval
    );
    println!("  Lookup batch size: {}", config.client.lookup_batch_size);
    println!(
        "  Rate limit backoff: {}ms (+{}ms after Retry-After)",
        config.client.rate_limit_backoff, config.client.retry_after_buffer
    );
    println!(
        "  Token refresh margin: {}s",
        config.client.token_refresh_margin
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {}", config.output.format);

    println!("\nCredentials:");
    println!("  Token URL: {}", credentials.token_url());
    println!("  Client ID: {}", credentials.client_id());
    println!("  Client secret: <redacted>");

    println!("\n✓ Configuration is valid");
}

fn print_categories(categories: &[Category]) {
    println!("\nCustom URL categories:");
    for (index, category) in categories.iter().enumerate() {
        println!("[{}] {}", index + 1, category);
    }
}

/// Asks for the export format, falling back to the configured default
fn prompt_format(default: ExportFormat) -> io::Result<ExportFormat> {
    println!("\nExport format:");
    for (index, format) in ExportFormat::all().iter().enumerate() {
        println!("  {}. {}", index + 1, format);
    }

    let answer = prompt(&format!("Choose a format [{}]: ", default))?;
    if answer.is_empty() {
        return Ok(default);
    }
    match answer.parse() {
        Ok(format) => Ok(format),
        Err(e) => {
            tracing::warn!("{}; using {}", e, default);
            Ok(default)
        }
    }
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== Run Summary ===");
    for outcome in &summary.outcomes {
        match outcome {
            CategoryOutcome::Analyzed {
                report,
                output_path,
            } => println!(
                "  ✓ {} ({}): {:.2}% categorized, saved to {}",
                report.category_name,
                report.category_id,
                report.coverage.percent_categorized(),
                output_path.display()
            ),
            CategoryOutcome::Empty { id, name } => {
                println!("  - {} ({}): no URLs", name, id)
            }
            CategoryOutcome::Failed { id, error } => println!("  ✗ {}: {}", id, error),
        }
    }
    println!(
        "\n{} analyzed, {} empty, {} failed",
        summary.analyzed_count(),
        summary.empty_count(),
        summary.failed_count()
    );
}

//! ZIA Category Analyzer: URL-category coverage reporting
//!
//! This crate implements a reporting client for the ZIA URL-categorization API.
//! It authenticates with OAuth client-credentials, enumerates custom URL
//! categories, re-resolves the vendor classification of every URL they hold
//! through rate-limited bulk lookups, and exports a per-category coverage report.

pub mod analyzer;
pub mod categories;
pub mod client;
pub mod config;
pub mod lookup;
pub mod report;

use thiserror::Error;

/// Main error type for analyzer operations
#[derive(Debug, Error)]
pub enum ZiaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed at {endpoint}: {message}")]
    Auth { endpoint: String, message: String },

    #[error("Rate limited twice by {endpoint}: {body}")]
    RateLimited { endpoint: String, body: String },

    #[error("API request to {endpoint} failed with HTTP {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] report::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZiaError {
    /// Returns true if the error must stop the whole run
    ///
    /// Only authentication failures are fatal; every other error is scoped to
    /// the category being analyzed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),
}

/// Errors for individual tokens of an interactive category selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{token}' is out of range (1-{max})")]
    OutOfRange { token: String, max: usize },
}

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, ZiaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analyzer::{Analyzer, CategoryOutcome, RunSummary};
pub use categories::Category;
pub use client::Gateway;
pub use config::{Config, Credentials};
pub use lookup::Classification;
pub use report::{CoverageReport, ExportFormat};

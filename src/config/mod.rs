//! Configuration module for the analyzer
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and reading OAuth credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use zia_category_analyzer::config::{resolve_config, Credentials};
//!
//! let config = resolve_config(None, None).unwrap();
//! let credentials = Credentials::from_env().unwrap();
//! println!("Token endpoint: {}", credentials.token_url());
//! println!("Lookup batch size: {}", config.client.lookup_batch_size);
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::{Credentials, CLIENT_ID_ENV, CLIENT_SECRET_ENV, IDENTITY_BASE_URL_ENV};
pub use types::{
    ApiConfig, ClientConfig, Config, OutputConfig, DEFAULT_API_BASE_URL, DEFAULT_AUDIENCE,
};
pub use validation::MAX_LOOKUP_BATCH_SIZE;

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config, API_BASE_URL_ENV};

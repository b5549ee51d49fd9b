use crate::report::ExportFormat;
use serde::Deserialize;
use std::time::Duration;

/// Default ZIA API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.zsapi.net";

/// Audience requested during the client-credentials exchange
pub const DEFAULT_AUDIENCE: &str = "https://api.zscaler.com";

/// Main configuration structure for the analyzer
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// values the vendor documents as safe.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Vendor endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the ZIA API (the `/zia/api/v1` prefix is appended)
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    /// Audience sent with the token request
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Request pacing and batching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Minimum time between two API requests (milliseconds)
    #[serde(
        rename = "min-request-interval",
        default = "default_min_request_interval"
    )]
    pub min_request_interval: u64,

    /// Maximum number of URLs submitted per lookup request
    #[serde(rename = "lookup-batch-size", default = "default_lookup_batch_size")]
    pub lookup_batch_size: usize,

    /// Backoff used when a 429 body carries no usable Retry-After (milliseconds)
    #[serde(rename = "rate-limit-backoff", default = "default_rate_limit_backoff")]
    pub rate_limit_backoff: u64,

    /// Extra wait added to a parsed Retry-After value (milliseconds)
    #[serde(rename = "retry-after-buffer", default = "default_retry_after_buffer")]
    pub retry_after_buffer: u64,

    /// Safety margin subtracted from the token lifetime (seconds)
    #[serde(
        rename = "token-refresh-margin",
        default = "default_token_refresh_margin"
    )]
    pub token_refresh_margin: u64,
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-category reports are written to
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Default export format when none is given on the command line
    #[serde(default)]
    pub format: ExportFormat,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl ClientConfig {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_millis(self.rate_limit_backoff)
    }

    pub fn retry_after_buffer(&self) -> Duration {
        Duration::from_millis(self.retry_after_buffer)
    }

    pub fn token_refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            audience: default_audience(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            min_request_interval: default_min_request_interval(),
            lookup_batch_size: default_lookup_batch_size(),
            rate_limit_backoff: default_rate_limit_backoff(),
            retry_after_buffer: default_retry_after_buffer(),
            token_refresh_margin: default_token_refresh_margin(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: ExportFormat::default(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_min_request_interval() -> u64 {
    2000
}

fn default_lookup_batch_size() -> usize {
    100
}

fn default_rate_limit_backoff() -> u64 {
    3000
}

fn default_retry_after_buffer() -> u64 {
    2000
}

fn default_token_refresh_margin() -> u64 {
    300
}

fn default_output_directory() -> String {
    ".".to_string()
}

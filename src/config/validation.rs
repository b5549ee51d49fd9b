use crate::config::types::{ApiConfig, ClientConfig, Config, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Largest batch the bulk lookup endpoint accepts
pub const MAX_LOOKUP_BATCH_SIZE: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates endpoint configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_base_url("api_base_url", &config.api_base_url)?;

    if config.audience.trim().is_empty() {
        return Err(ConfigError::Validation(
            "audience cannot be empty".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates pacing and batching configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.min_request_interval < 100 {
        return Err(ConfigError::Validation(format!(
            "min_request_interval must be >= 100ms, got {}ms",
            config.min_request_interval
        )));
    }

    if config.lookup_batch_size < 1 || config.lookup_batch_size > MAX_LOOKUP_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "lookup_batch_size must be between 1 and {}, got {}",
            MAX_LOOKUP_BATCH_SIZE, config.lookup_batch_size
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a base URL parses and uses an HTTP scheme
pub(crate) fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

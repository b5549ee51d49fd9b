use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable that overrides `api.api-base-url`
pub const API_BASE_URL_ENV: &str = "ZSCALER_API_BASE_URL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use zia_category_analyzer::config::load_config;
///
/// let config = load_config(Path::new("analyzer.toml")).unwrap();
/// println!("Batch size: {}", config.client.lookup_batch_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves the effective configuration for a run
///
/// Reads the file when a path is given, otherwise starts from defaults. The
/// `ZSCALER_API_BASE_URL` environment variable, when set and non-empty,
/// replaces the configured API base URL, and `output_dir` replaces the
/// output directory. Validation runs after both overrides.
pub fn resolve_config(
    path: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    if let Ok(base) = std::env::var(API_BASE_URL_ENV) {
        let base = base.trim();
        if !base.is_empty() {
            config.api.api_base_url = base.to_string();
        }
    }

    if let Some(dir) = output_dir {
        config.output.directory = dir.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ExportFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[api]
api-base-url = "https://api.example.net"
request-timeout = 10

[client]
min-request-interval = 2500
lookup-batch-size = 50

[output]
directory = "./reports"
format = "xlsx"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.api.api_base_url, "https://api.example.net");
        assert_eq!(config.api.request_timeout, 10);
        assert_eq!(config.client.min_request_interval, 2500);
        assert_eq!(config.client.lookup_batch_size, 50);
        assert_eq!(config.output.directory, "./reports");
        assert_eq!(config.output.format, ExportFormat::Xlsx);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.api.api_base_url, "https://api.zsapi.net");
        assert_eq!(config.api.audience, "https://api.zscaler.com");
        assert_eq!(config.client.min_request_interval, 2000);
        assert_eq!(config.client.lookup_batch_size, 100);
        assert_eq!(config.client.rate_limit_backoff, 3000);
        assert_eq!(config.client.retry_after_buffer, 2000);
        assert_eq!(config.client.token_refresh_margin, 300);
        assert_eq!(config.output.format, ExportFormat::Csv);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/analyzer.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_output_dir_override_is_validated() {
        let result = resolve_config(None, Some(Path::new("")));
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let file = create_temp_config("[output]\ndirectory = \"./reports\"\n");
        let config = resolve_config(Some(file.path()), Some(Path::new("out/run1"))).unwrap();
        assert_eq!(config.output.directory, "out/run1");
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[client]
lookup-batch-size = 500
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = parse_config("[output]\nformat = \"pdf\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

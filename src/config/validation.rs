use crate::config::types::{Config, CrawlerConfig, FilterConfig, HttpConfig, OutputConfig};
use crate::ConfigError;

const MAX_CONCURRENCY: usize = 100;
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_REDIRECTS: usize = 20;
const MAX_PROBE_RETRIES: u32 = 5;

/// Validates the entire configuration
///
/// Out-of-range values are reported, never clamped.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_filter_config(&config.filter)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be at most {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.probe_retries > MAX_PROBE_RETRIES {
        return Err(ConfigError::Validation(format!(
            "probe-retries must be at most {}, got {}",
            MAX_PROBE_RETRIES, config.probe_retries
        )));
    }

    Ok(())
}

/// Validates link filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    // An empty segment would match every href
    if config
        .excluded_path_segments
        .iter()
        .any(|segment| segment.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "excluded-path-segments cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

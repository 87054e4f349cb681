use crate::config::types::{Config, FetcherConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the seed URL and destination directory
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Site url '{}' must use the http or https scheme",
            config.url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Site url '{}' has no host",
            config.url
        )));
    }

    if config.location_on_disk.trim().is_empty() {
        return Err(ConfigError::Validation(
            "location_on_disk cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates download limits and timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_downloads < 1 || config.max_concurrent_downloads > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_downloads must be between 1 and 100, got {}",
            config.max_concurrent_downloads
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

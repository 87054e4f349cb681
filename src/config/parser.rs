use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement seed URL
    pub url: Option<String>,

    /// Replacement destination directory
    pub location_on_disk: Option<String>,

    /// Replacement download concurrency cap
    pub max_concurrent_downloads: Option<usize>,
}

impl ConfigOverrides {
    /// Returns true if no override is set
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.location_on_disk.is_none()
            && self.max_concurrent_downloads.is_none()
    }
}

/// Reads the TOML file at `path` and returns the validated configuration
///
/// Fails with [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::Parse`] on malformed TOML and
/// [`ConfigError::Validation`] / [`ConfigError::InvalidUrl`] when a value is
/// out of range.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Seed: {}", config.site.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Applies command-line overrides and re-validates the result
pub fn apply_overrides(mut config: Config, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    if overrides.is_empty() {
        return Ok(config);
    }

    if let Some(url) = overrides.url {
        config.site.url = url;
    }
    if let Some(location) = overrides.location_on_disk {
        config.site.location_on_disk = location;
    }
    if let Some(max) = overrides.max_concurrent_downloads {
        config.fetcher.max_concurrent_downloads = max;
    }

    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 digest of a configuration file, logged at startup
/// so a run can be matched to the exact file it used
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(digest_hex(&std::fs::read_to_string(path)?))
}

/// Reads the configuration once and returns it together with its digest
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let config = parse_config(&raw)?;
    Ok((config, digest_hex(&raw)))
}

fn digest_hex(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

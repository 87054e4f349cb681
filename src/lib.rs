//! Site-Harvest: a single-site mirroring crawler
//!
//! This crate crawls one website from a seed URL, discovers the HTML pages and
//! non-HTML resources reachable from it, downloads the resources with a small
//! concurrency cap and mirrors everything onto local disk.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load page {url}: {source}")]
    PageFetch {
        url: String,
        #[source]
        source: crawler::FetchError,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event consumer failed: {0}")]
    EventLoop(String),
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
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEvent, EventSink, ProgressStage};
pub use url::{classify_resource, normalize_url, ResourceKind};

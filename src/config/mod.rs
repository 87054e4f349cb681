//! Configuration module for Site-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Mirroring {} into {}", config.site.url, config.site.location_on_disk);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, SiteConfig, UserAgentConfig, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_CONCURRENT_DOWNLOADS, DEFAULT_REQUEST_TIMEOUT,
};

// Re-export parser functions
pub use parser::{
    apply_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
    ConfigOverrides,
};

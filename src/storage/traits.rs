//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("URL does not map to a file: {url}")]
    NotAFile { url: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backends
///
/// Backends map each URL to a location of their own and overwrite whatever
/// is already there. Implementations must be usable from several tasks.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores a downloaded resource byte for byte
    ///
    /// # Returns
    ///
    /// The location written to
    async fn save_bytes(&self, url: &Url, bytes: &[u8]) -> StorageResult<PathBuf>;

    /// Stores the HTML text of a page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The location written to
    /// * `Ok(None)` - The URL names a directory, nothing was written
    async fn save_html(&self, url: &Url, html: &str) -> StorageResult<Option<PathBuf>>;
}

//! Filesystem storage implementation
//!
//! Files land under a root directory at the URL's path, so
//! `https://example.com/img/logo.png` becomes `<root>/img/logo.png`.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Filesystem storage backend
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Creates a backend writing under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory everything is written under
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, path: PathBuf, contents: &[u8]) -> StorageResult<PathBuf> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

#[async_trait]
impl Storage for DiskStorage {
    async fn save_bytes(&self, url: &Url, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = local_path_for(&self.root, url).ok_or_else(|| StorageError::NotAFile {
            url: url.to_string(),
        })?;
        self.write(path, bytes).await
    }

    async fn save_html(&self, url: &Url, html: &str) -> StorageResult<Option<PathBuf>> {
        match local_path_for(&self.root, url) {
            Some(path) => self.write(path, html.as_bytes()).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Maps a URL onto a file path under `root`
///
/// The URL's path segments are appended to `root` as they appear in the URL
/// (still percent-encoded). The query and fragment are ignored.
///
/// # Returns
///
/// * `Some(PathBuf)` - The file the URL maps to
/// * `None` - The path ends in `/` (or is empty), so it names a directory
///
/// # Examples
///
/// ```
/// use site_harvest::storage::local_path_for;
/// use std::path::Path;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/img/logo.png").unwrap();
/// assert_eq!(
///     local_path_for(Path::new("/srv/mirror"), &url),
///     Some(Path::new("/srv/mirror/img/logo.png").to_path_buf())
/// );
///
/// let dir = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(local_path_for(Path::new("/srv/mirror"), &dir), None);
/// ```
pub fn local_path_for(root: &Path, url: &Url) -> Option<PathBuf> {
    let segments: Vec<&str> = url.path_segments()?.collect();

    match segments.last() {
        Some(last) if !last.is_empty() => {}
        _ => return None,
    }

    let mut path = root.to_path_buf();
    for segment in segments {
        // Parsed URLs have no dot segments left; empty ones come from `//`
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        path.push(segment);
    }
    Some(path)
}

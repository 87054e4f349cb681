//! URL handling module for Site-Harvest
//!
//! This module provides URL identity normalization and the page/file
//! classification that drives the traversal.

mod normalize;

use ::url::Url;

// Re-export main functions
pub use normalize::{normalize_url, strip_fragment};

/// Marker that makes a discovered resource a traversable page
pub const PAGE_MARKER: &str = ".html";

/// Resource classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// HTML page - fetched as text and traversed further
    Page,
    /// Any other resource - terminal, downloaded as bytes
    File,
}

impl ResourceKind {
    /// Returns true if the resource should be traversed
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page)
    }

    /// Returns true if the resource is terminal (downloaded, never parsed)
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }
}

/// Classifies a resource as a page or a file
///
/// The decision is a plain substring test: the URL path containing `.html`
/// anywhere makes it a page. Content types are never consulted, so
/// extensionless pages are treated as files and `.html` in a query string
/// does not count (the query is not part of the path).
///
/// # Examples
///
/// ```
/// use site_harvest::url::{classify_resource, ResourceKind};
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/index.html").unwrap();
/// assert_eq!(classify_resource(&page), ResourceKind::Page);
///
/// let image = Url::parse("https://example.com/logo.png").unwrap();
/// assert_eq!(classify_resource(&image), ResourceKind::File);
/// ```
pub fn classify_resource(url: &Url) -> ResourceKind {
    if url.path().contains(PAGE_MARKER) {
        ResourceKind::Page
    } else {
        ResourceKind::File
    }
}

/// Splits resources into `(links, files)` keeping the input order in each half
pub fn partition_resources<I>(resources: I) -> (Vec<Url>, Vec<Url>)
where
    I: IntoIterator<Item = Url>,
{
    resources
        .into_iter()
        .partition(|resource| classify_resource(resource).is_page())
}

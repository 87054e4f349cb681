//! Resource extraction from HTML pages
//!
//! Every element carrying attributes contributes its `src` and `href`
//! values, resolved against the page URL. Elements whose serialized form
//! mentions `http:` anywhere (their own attributes, text or any descendant)
//! are skipped entirely, which keeps inline absolute links out of the crawl.

use crate::url::strip_fragment;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Elements whose outer HTML contains this are ignored
pub const EXCLUDED_MARKER: &str = "http:";

/// Attributes that reference other resources
const RESOURCE_ATTRIBUTES: [&str; 2] = ["src", "href"];

/// Extracts the absolute URLs referenced by an HTML document
///
/// # Arguments
///
/// * `html` - The page content; malformed markup is recovered best-effort
/// * `base_url` - The page URL relative references are resolved against
///
/// # Returns
///
/// The distinct resolved URLs in first-seen document order. Fragments are
/// dropped, so `a.html#x` and `a.html` are the same entry. Values that
/// cannot be resolved into a URL are skipped.
///
/// # Example
///
/// ```
/// use site_harvest::crawler::extract_resources;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let html = r#"<a href="intro.html">Intro</a><img src="/logo.png">"#;
/// let resources = extract_resources(html, &base);
/// assert_eq!(resources[0].as_str(), "https://example.com/docs/intro.html");
/// assert_eq!(resources[1].as_str(), "https://example.com/logo.png");
/// ```
pub fn extract_resources(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut resources = Vec::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if element.value().attrs().next().is_none() {
            continue;
        }

        if element.html().contains(EXCLUDED_MARKER) {
            tracing::trace!(
                "Skipping <{}> on {}: serialized form mentions {}",
                element.value().name(),
                base_url,
                EXCLUDED_MARKER
            );
            continue;
        }

        for (name, value) in element.value().attrs() {
            if !RESOURCE_ATTRIBUTES.contains(&name) {
                continue;
            }

            match base_url.join(value) {
                Ok(resolved) => {
                    let resolved = strip_fragment(resolved);
                    if seen.insert(resolved.clone()) {
                        resources.push(resolved);
                    }
                }
                Err(e) => {
                    tracing::debug!("Cannot resolve {}=\"{}\" on {}: {}", name, value, base_url, e);
                }
            }
        }
    }

    resources
}

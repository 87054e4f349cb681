//! Depth-first page traversal
//!
//! Starting from the seed, each page is fetched, its resources extracted and
//! split into further pages and terminal files. Pages are followed one at a
//! time in document order, each subtree completing before the next sibling
//! is fetched. An explicit stack replaces recursion so large sites cannot
//! exhaust the call stack; the visiting order is the same pre-order.

use crate::crawler::events::{CrawlEvent, EventSink};
use crate::crawler::extractor::extract_resources;
use crate::crawler::source::HttpSource;
use crate::url::{partition_resources, strip_fragment};
use crate::HarvestError;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Outcome of a full traversal
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    /// Pages fetched, in visiting order
    pub pages: Vec<Url>,

    /// Files found on those pages, deduplicated in first-seen order
    pub files: Vec<Url>,

    /// Number of files accumulated before deduplication
    pub files_discovered: usize,
}

/// Sequential depth-first crawler over the pages of a site
pub struct PageTraverser {
    source: Arc<dyn HttpSource>,
    events: EventSink,
}

impl PageTraverser {
    /// Creates a traverser reporting to `events`
    pub fn new(source: Arc<dyn HttpSource>, events: EventSink) -> Self {
        Self { source, events }
    }

    /// Crawls every page reachable from `seed`
    ///
    /// Each distinct page URL is fetched at most once; the visited set is the
    /// only termination mechanism, so any finite link graph (cycles
    /// included) completes. There is no depth limit.
    ///
    /// # Errors
    ///
    /// Fails fast with [`HarvestError::PageFetch`] on the first page that
    /// cannot be loaded. Nothing gathered so far is returned.
    pub async fn traverse(&self, seed: Url) -> Result<Traversal, HarvestError> {
        let mut visited: HashSet<Url> = HashSet::new();
        let mut pages = Vec::new();
        let mut accumulated: Vec<Url> = Vec::new();
        let mut stack = vec![strip_fragment(seed)];

        while let Some(url) = stack.pop() {
            if !visited.insert(url.clone()) {
                continue;
            }

            tracing::debug!("Loading page: {}", url);
            let html = self
                .source
                .get_text(&url)
                .await
                .map_err(|source| HarvestError::PageFetch {
                    url: url.to_string(),
                    source,
                })?;

            let resources = extract_resources(&html, &url);
            self.events.emit(CrawlEvent::PageLoaded {
                url: url.clone(),
                html,
            });

            let (links, files) = partition_resources(resources);
            tracing::debug!(
                "Page {} links to {} pages and {} files",
                url,
                links.len(),
                files.len()
            );

            accumulated.extend(files);
            pages.push(url);

            self.events.emit(CrawlEvent::ItemTraversed {
                pages: visited.len(),
                files: accumulated.len(),
            });

            // Reversed so the first link on the page is popped first
            stack.extend(links.into_iter().rev());
        }

        let files_discovered = accumulated.len();
        let files = dedup_preserving_order(accumulated);

        tracing::info!(
            "Traversal finished: {} pages, {} files ({} before deduplication)",
            pages.len(),
            files.len(),
            files_discovered
        );

        Ok(Traversal {
            pages,
            files,
            files_discovered,
        })
    }
}

fn dedup_preserving_order(urls: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

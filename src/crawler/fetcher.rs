//! Resource downloader
//!
//! This module downloads the non-HTML files found during traversal:
//! - Concurrency is capped by a semaphore (2 in-flight requests by default)
//! - A failed download is logged and dropped, never retried
//! - Completion order is not preserved

use crate::crawler::events::{EventSink, ProgressStage};
use crate::crawler::source::HttpSource;
use crate::config::DEFAULT_MAX_CONCURRENT_DOWNLOADS;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A successfully downloaded resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// Where the bytes came from
    pub url: Url,

    /// The response body exactly as received
    pub bytes: Vec<u8>,
}

/// Downloads resources with bounded concurrency
pub struct ContentFetcher {
    source: Arc<dyn HttpSource>,
    max_concurrent: usize,
    events: EventSink,
}

impl ContentFetcher {
    /// Creates a fetcher with the default cap of two concurrent downloads
    pub fn new(source: Arc<dyn HttpSource>, events: EventSink) -> Self {
        Self::with_concurrency(source, DEFAULT_MAX_CONCURRENT_DOWNLOADS, events)
    }

    /// Creates a fetcher allowing `max_concurrent` downloads at once (at least one)
    pub fn with_concurrency(
        source: Arc<dyn HttpSource>,
        max_concurrent: usize,
        events: EventSink,
    ) -> Self {
        Self {
            source,
            max_concurrent: max_concurrent.max(1),
            events,
        }
    }

    /// Returns the concurrency cap
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Downloads every URL and returns the ones that succeeded
    ///
    /// Failures are isolated: a URL that errors is logged and simply absent
    /// from the result. Each success emits a
    /// [`ProgressStage::Download`] progress event.
    pub async fn fetch(&self, urls: Vec<Url>) -> Vec<FetchedResource> {
        let total = urls.len();
        if total == 0 {
            return Vec::new();
        }

        tracing::info!(
            "Downloading {} resources ({} at a time)",
            total,
            self.max_concurrent
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for url in urls {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);
            let events = self.events.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        tracing::error!("Download slot unavailable for {}: {}", url, e);
                        return None;
                    }
                };

                match source.get_bytes(&url).await {
                    Ok(bytes) => {
                        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        tracing::debug!("Downloaded {} ({} bytes)", url, bytes.len());
                        events.progress(ProgressStage::Download, done, total);
                        Some(FetchedResource { url, bytes })
                    }
                    Err(e) => {
                        tracing::error!("Content not found for URL {}: {}", url, e);
                        None
                    }
                }
            });
        }

        let mut resources = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(resource)) => resources.push(resource),
                Ok(None) => {}
                Err(e) => tracing::error!("Download task failed: {}", e),
            }
        }

        tracing::info!(
            "Downloaded {} of {} resources",
            resources.len(),
            total
        );

        resources
    }
}

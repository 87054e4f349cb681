//! Scrape coordinator - main orchestration logic
//!
//! This module wires the stages of a scrape together:
//! - Traversing the site and saving pages as they load
//! - Downloading the discovered resources
//! - Saving the downloads to disk
//! - Collecting statistics from the event stream

use crate::config::Config;
use crate::crawler::events::{CrawlEvent, EventSink};
use crate::crawler::fetcher::ContentFetcher;
use crate::crawler::source::{HttpSource, ReqwestSource};
use crate::crawler::traverser::PageTraverser;
use crate::output::{ProgressReporter, ScrapeStatistics};
use crate::storage::{save_all, DiskStorage, SaveOutcome, Storage};
use crate::url::normalize_url;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

/// Main scrape coordinator structure
pub struct Scraper {
    source: Arc<dyn HttpSource>,
    storage: Arc<dyn Storage>,
    seed: Url,
    max_concurrent: usize,
}

impl Scraper {
    /// Creates a scraper from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to run
    /// * `Err(HarvestError)` - The seed URL is invalid or the HTTP client
    ///   could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let seed = normalize_url(&config.site.url)?;
        let source = ReqwestSource::from_config(&config.user_agent, &config.fetcher)?;
        let storage = DiskStorage::new(&config.site.location_on_disk);

        Ok(Self::with_parts(
            Arc::new(source),
            Arc::new(storage),
            seed,
            config.fetcher.max_concurrent_downloads,
        ))
    }

    /// Creates a scraper from explicit collaborators
    pub fn with_parts(
        source: Arc<dyn HttpSource>,
        storage: Arc<dyn Storage>,
        seed: Url,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            storage,
            seed,
            max_concurrent,
        }
    }

    /// The page the crawl starts from
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Runs the whole scrape
    ///
    /// 1. Traverses the site; each loaded page is saved by the event consumer
    /// 2. Downloads every discovered file
    /// 3. Saves the downloads
    ///
    /// # Errors
    ///
    /// A page that cannot be loaded aborts the run with
    /// [`HarvestError::PageFetch`]. Pages saved before the failure stay on
    /// disk. Download and save failures are logged and counted only.
    pub async fn run(&self) -> Result<ScrapeStatistics, HarvestError> {
        tracing::info!("Starting scrape of {}", self.seed);
        let started = Instant::now();

        let (events, receiver) = EventSink::channel();
        let consumer = tokio::spawn(consume_events(receiver, Arc::clone(&self.storage)));

        let stages = self.run_stages(events).await;

        // Every sender is gone once the stages return, so the consumer drains and exits
        let reporter = consumer
            .await
            .map_err(|e| HarvestError::EventLoop(e.to_string()))?;

        let (unique_files, downloaded, outcome) = stages?;

        let mut stats = reporter.into_statistics();
        stats.unique_files = unique_files;
        stats.resources_downloaded = downloaded;
        stats.resources_saved = outcome.saved;
        stats.save_failures += outcome.failed;
        stats.elapsed = started.elapsed();

        tracing::info!(
            "Scrape completed: {} pages, {} resources saved in {:?}",
            stats.pages_loaded,
            stats.resources_saved,
            stats.elapsed
        );

        Ok(stats)
    }

    async fn run_stages(&self, events: EventSink) -> Result<(usize, usize, SaveOutcome), HarvestError> {
        let traversal = PageTraverser::new(Arc::clone(&self.source), events.clone())
            .traverse(self.seed.clone())
            .await?;
        let unique_files = traversal.files.len();

        let fetcher =
            ContentFetcher::with_concurrency(Arc::clone(&self.source), self.max_concurrent, events.clone());
        let resources = fetcher.fetch(traversal.files).await;

        if resources.is_empty() {
            tracing::warn!("No data can be saved. Check if there are valid items.");
            return Ok((unique_files, 0, SaveOutcome::default()));
        }

        let outcome = save_all(self.storage.as_ref(), &resources, &events).await;
        Ok((unique_files, resources.len(), outcome))
    }
}

/// Consumes crawl events until every sender is dropped
///
/// Loaded pages are written through `storage`; all events feed the
/// progress reporter.
async fn consume_events(
    mut receiver: UnboundedReceiver<CrawlEvent>,
    storage: Arc<dyn Storage>,
) -> ProgressReporter {
    let mut reporter = ProgressReporter::new();

    while let Some(event) = receiver.recv().await {
        if let CrawlEvent::PageLoaded { url, html } = &event {
            match storage.save_html(url, html).await {
                Ok(Some(path)) => {
                    tracing::debug!("Saved page {} to {}", url, path.display());
                    reporter.record_page_saved();
                }
                Ok(None) => tracing::debug!("Page {} maps to a directory, not saved", url),
                Err(e) => {
                    tracing::error!("Can not save the content of {}: {}", url, e);
                    reporter.record_save_failure();
                }
            }
        }
        reporter.observe(&event);
    }

    reporter
}

/// Runs a complete scrape from configuration
///
/// If the HTTP client cannot be created there is nothing to fetch: the
/// error is logged and empty statistics are returned.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::load_config;
/// use site_harvest::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let stats = run_scrape(&config).await?;
/// println!("{} pages", stats.pages_loaded);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config) -> Result<ScrapeStatistics, HarvestError> {
    let scraper = match Scraper::new(config) {
        Ok(scraper) => scraper,
        Err(HarvestError::HttpClient(e)) => {
            tracing::error!("Error creating HTTP client, nothing to fetch: {}", e);
            return Ok(ScrapeStatistics::default());
        }
        Err(e) => return Err(e),
    };

    scraper.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        files: HashMap<String, Vec<u8>>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn file(mut self, url: &str, bytes: &[u8]) -> Self {
            self.files.insert(url.to_string(), bytes.to_vec());
            self
        }
    }

    #[async_trait]
    impl HttpSource for FakeSite {
        async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
            self.pages.get(url.as_str()).cloned().ok_or(FetchError::Missing)
        }

        async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
            self.files.get(url.as_str()).cloned().ok_or(FetchError::Missing)
        }
    }

    fn scraper(site: FakeSite, dir: &TempDir, seed: &str) -> Scraper {
        Scraper::with_parts(
            Arc::new(site),
            Arc::new(DiskStorage::new(dir.path())),
            Url::parse(seed).unwrap(),
            2,
        )
    }

    #[tokio::test]
    async fn test_run_mirrors_pages_and_files() {
        let dir = TempDir::new().unwrap();
        let site = FakeSite::default()
            .page(
                "http://x/index.html",
                r#"<a href="docs/page2.html">Next</a><img src="logo.png">"#,
            )
            .page("http://x/docs/page2.html", r#"<img src="../logo.png"><img src="gone.png">"#)
            .file("http://x/logo.png", &[0x89, 0x50, 0x4e, 0x47]);

        let stats = scraper(site, &dir, "http://x/index.html").run().await.unwrap();

        assert_eq!(stats.pages_loaded, 2);
        assert_eq!(stats.pages_saved, 2);
        assert_eq!(stats.files_discovered, 3);
        assert_eq!(stats.unique_files, 2);
        assert_eq!(stats.resources_downloaded, 1);
        assert_eq!(stats.resources_saved, 1);

        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("docs").join("page2.html").exists());
        assert_eq!(
            std::fs::read(dir.path().join("logo.png")).unwrap(),
            vec![0x89, 0x50, 0x4e, 0x47]
        );
        assert!(!dir.path().join("docs").join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_run_without_files_saves_pages_only() {
        let dir = TempDir::new().unwrap();
        let site = FakeSite::default().page("http://x/index.html", "<p>nothing linked</p>");

        let stats = scraper(site, &dir, "http://x/index.html").run().await.unwrap();

        assert_eq!(stats.pages_saved, 1);
        assert_eq!(stats.resources_downloaded, 0);
        assert_eq!(stats.resources_saved, 0);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_but_keeps_saved_pages() {
        let dir = TempDir::new().unwrap();
        let site = FakeSite::default()
            .page(
                "http://x/index.html",
                r#"<a href="broken.html">Broken</a><img src="logo.png">"#,
            )
            .file("http://x/logo.png", b"png");

        let result = scraper(site, &dir, "http://x/index.html").run().await;

        assert!(matches!(result, Err(HarvestError::PageFetch { .. })));
        assert!(dir.path().join("index.html").exists());
        assert!(!dir.path().join("logo.png").exists());
    }

    #[tokio::test]
    async fn test_run_scrape_rejects_bad_seed() {
        let config = Config {
            site: crate::config::SiteConfig {
                url: "not a url".to_string(),
                location_on_disk: "./unused".to_string(),
            },
            fetcher: Default::default(),
            user_agent: Default::default(),
        };

        assert!(matches!(
            run_scrape(&config).await,
            Err(HarvestError::UrlParse(_))
        ));
    }
}

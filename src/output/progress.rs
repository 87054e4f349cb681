//! Progress reporting for a running scrape
//!
//! The reporter is the presentation-side consumer of [`CrawlEvent`]s. It
//! keeps running totals and logs milestones through `tracing`.

use crate::crawler::{CrawlEvent, ProgressStage};
use crate::output::stats::ScrapeStatistics;

/// Percentage step between logged progress lines
const PROGRESS_LOG_STEP: f64 = 10.0;

/// Folds crawl events into statistics and logs progress
#[derive(Debug, Default)]
pub struct ProgressReporter {
    stats: ScrapeStatistics,
    last_logged: [f64; 2],
}

impl ProgressReporter {
    /// Creates a reporter with zeroed totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates totals from one event
    pub fn observe(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::PageLoaded { url, html } => {
                self.stats.pages_loaded += 1;
                tracing::debug!("Page loaded: {} ({} bytes)", url, html.len());
            }
            CrawlEvent::ItemTraversed { pages, files } => {
                self.stats.files_discovered = *files;
                tracing::info!(
                    "Collecting resources: {} pages traversed, {} other resources, {} total",
                    pages,
                    files,
                    pages + files
                );
            }
            CrawlEvent::ProgressChanged {
                stage,
                completed,
                percentage,
            } => {
                match stage {
                    // Concurrent downloads may report slightly out of order
                    ProgressStage::Download => {
                        self.stats.resources_downloaded =
                            self.stats.resources_downloaded.max(*completed)
                    }
                    ProgressStage::Save => self.stats.resources_saved += 1,
                }
                self.log_progress(*stage, *completed, *percentage);
            }
        }
    }

    /// Counts a page written to disk
    pub fn record_page_saved(&mut self) {
        self.stats.pages_saved += 1;
    }

    /// Counts a page or resource that could not be written
    pub fn record_save_failure(&mut self) {
        self.stats.save_failures += 1;
    }

    /// Current totals
    pub fn statistics(&self) -> &ScrapeStatistics {
        &self.stats
    }

    /// Consumes the reporter, returning its totals
    pub fn into_statistics(self) -> ScrapeStatistics {
        self.stats
    }

    fn log_progress(&mut self, stage: ProgressStage, completed: usize, percentage: f64) {
        let slot = match stage {
            ProgressStage::Download => 0,
            ProgressStage::Save => 1,
        };

        let last = &mut self.last_logged[slot];
        if percentage >= 100.0 || percentage - *last >= PROGRESS_LOG_STEP {
            *last = percentage;
            tracing::info!("{:?} progress: {} items ({:.0}%)", stage, completed, percentage);
        } else {
            tracing::trace!("{:?} progress: {} items ({:.1}%)", stage, completed, percentage);
        }
    }
}

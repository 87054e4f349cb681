//! End-of-run statistics
//!
//! This module holds the figures collected over a scrape and prints them
//! once the run is over.

use std::time::Duration;

/// Scrape statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeStatistics {
    /// Pages fetched during traversal
    pub pages_loaded: usize,

    /// Pages whose HTML was written to disk
    pub pages_saved: usize,

    /// Files accumulated during traversal, duplicates included
    pub files_discovered: usize,

    /// Distinct files handed to the downloader
    pub unique_files: usize,

    /// Resources downloaded successfully
    pub resources_downloaded: usize,

    /// Resources written to disk
    pub resources_saved: usize,

    /// Pages and resources that could not be written
    pub save_failures: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ScrapeStatistics {
    /// Number of distinct files that could not be downloaded
    pub fn download_failures(&self) -> usize {
        self.unique_files.saturating_sub(self.resources_downloaded)
    }

    /// Share of distinct files downloaded, as a percentage
    pub fn download_rate(&self) -> f64 {
        if self.unique_files == 0 {
            return 0.0;
        }
        (self.resources_downloaded as f64 / self.unique_files as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Scrape Statistics ===\n");

    println!("Traversal:");
    println!("  Pages loaded: {}", stats.pages_loaded);
    println!("  Pages saved: {}", stats.pages_saved);
    println!(
        "  Files discovered: {} ({} distinct)",
        stats.files_discovered, stats.unique_files
    );
    println!();

    println!("Downloads:");
    println!(
        "  Downloaded: {} ({:.1}%)",
        stats.resources_downloaded,
        stats.download_rate()
    );
    println!("  Failed: {}", stats.download_failures());
    println!("  Saved: {}", stats.resources_saved);
    println!();

    if stats.save_failures > 0 {
        println!("Save failures: {}", stats.save_failures);
        println!();
    }

    println!("Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
}

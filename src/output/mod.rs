//! Output module for reporting scrape progress and results
//!
//! This module handles:
//! - Turning crawl events into progress log lines
//! - Collecting statistics over a run
//! - Printing the end-of-run summary

mod progress;
pub mod stats;

pub use progress::ProgressReporter;
pub use stats::{print_statistics, ScrapeStatistics};

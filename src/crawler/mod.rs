//! Crawler module for site traversal and resource download
//!
//! This module contains the core crawling logic, including:
//! - Resource extraction from HTML pages
//! - Sequential depth-first page traversal
//! - Bounded-concurrency resource downloads
//! - The event stream consumed by progress reporting and page saving
//! - Overall scrape coordination

mod coordinator;
mod events;
mod extractor;
mod fetcher;
mod source;
mod traverser;

pub use coordinator::{run_scrape, Scraper};
pub use events::{percentage, CrawlEvent, EventSink, ProgressStage};
pub use extractor::{extract_resources, EXCLUDED_MARKER};
pub use fetcher::{ContentFetcher, FetchedResource};
pub use source::{build_http_client, FetchError, HttpSource, ReqwestSource};
pub use traverser::{PageTraverser, Traversal};

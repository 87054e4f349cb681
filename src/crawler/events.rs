//! Crawl notifications
//!
//! The crawler reports what it is doing through an unbounded channel of
//! [`CrawlEvent`]s. Emitting never blocks and never fails: a slow consumer
//! only grows the queue, and a missing or dropped consumer is ignored.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

/// Which loop a progress notification belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    /// Resource download loop
    Download,
    /// Resource save loop
    Save,
}

/// Notification emitted while a scrape runs
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// A page was fetched; fired once per distinct page, before its links
    /// are followed
    PageLoaded { url: Url, html: String },

    /// A page finished processing
    ItemTraversed {
        /// Number of pages visited so far
        pages: usize,
        /// Number of files accumulated so far (duplicates included)
        files: usize,
    },

    /// One unit of work of a stage completed
    ProgressChanged {
        stage: ProgressStage,
        completed: usize,
        percentage: f64,
    },
}

/// Sending half of the event stream
///
/// Cloning is cheap; every clone feeds the same consumer.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<CrawlEvent>>,
}

impl EventSink {
    /// Creates a sink together with the receiver its events go to
    pub fn channel() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Wraps an existing sender
    pub fn new(sender: UnboundedSender<CrawlEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink with no consumer; every event is discarded
    pub fn detached() -> Self {
        Self { sender: None }
    }

    /// Sends an event if anyone is listening
    pub fn emit(&self, event: CrawlEvent) {
        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                tracing::trace!("Event consumer is gone, dropping event");
            }
        }
    }

    /// Emits a [`CrawlEvent::ProgressChanged`] for `completed` out of `total`
    pub fn progress(&self, stage: ProgressStage, completed: usize, total: usize) {
        self.emit(CrawlEvent::ProgressChanged {
            stage,
            completed,
            percentage: percentage(completed, total),
        });
    }
}

/// Share of `total` that `completed` represents, in percent
pub fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

//! Storage module for persisting the mirrored site
//!
//! This module handles writing crawl output to disk:
//! - Mapping URLs onto paths under the configured root
//! - Saving page HTML as pages are loaded
//! - Saving downloaded resources in bulk with per-item error isolation

mod disk;
mod traits;

pub use disk::{local_path_for, DiskStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::crawler::{EventSink, FetchedResource, ProgressStage};

/// Tally of a bulk save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Items written successfully
    pub saved: usize,

    /// Items that failed and were skipped
    pub failed: usize,
}

/// Saves every downloaded resource, continuing past failures
///
/// A failed item is logged and skipped. Each successful save emits a
/// [`ProgressStage::Save`] event whose count is the item's position in
/// `items`.
///
/// # Arguments
///
/// * `storage` - The backend to write to
/// * `items` - The downloaded resources
/// * `events` - Where progress is reported
pub async fn save_all(
    storage: &dyn Storage,
    items: &[FetchedResource],
    events: &EventSink,
) -> SaveOutcome {
    let total = items.len();
    let mut outcome = SaveOutcome::default();

    for (index, item) in items.iter().enumerate() {
        match storage.save_bytes(&item.url, &item.bytes).await {
            Ok(path) => {
                tracing::debug!("Saved {} to {}", item.url, path.display());
                outcome.saved += 1;
                events.progress(ProgressStage::Save, index + 1, total);
            }
            Err(e) => {
                tracing::error!("Error saving {} to disk: {}", item.url, e);
                outcome.failed += 1;
            }
        }
    }

    tracing::info!(
        "Saved {} of {} resources ({} failed)",
        outcome.saved,
        total,
        outcome.failed
    );

    outcome
}

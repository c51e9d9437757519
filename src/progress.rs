//! Progress-callback trait for batch text extraction.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to observe
//! each PDF group as [`crate::extract::text_extract_from_pdfs`] decides to
//! skip, process, or give up on it.
//!
//! # Example
//!
//! ```rust
//! use slide_vlm::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_group_complete(&self, base: &str, inserted: usize) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{base}: {inserted} slides");
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// Why a PDF group was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SkipReason {
    /// A mapping key already contains the group's base name.
    AlreadyProcessed,
    /// No `{base}.pdf` next to the images folder.
    MissingPdf,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyProcessed => f.write_str("already processed"),
            SkipReason::MissingPdf => f.write_str("PDF not found"),
        }
    }
}

/// Called by the batch driver as it walks the PDF groups, in order.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the images folder has been grouped.
    fn on_batch_start(&self, total_groups: usize) {
        let _ = total_groups;
    }

    /// Called for a group that is skipped.
    fn on_group_skipped(&self, base: &str, reason: SkipReason) {
        let _ = (base, reason);
    }

    /// Called just before text is extracted from the group's PDF.
    fn on_group_start(&self, base: &str, image_count: usize) {
        let _ = (base, image_count);
    }

    /// Called after the group's texts were merged and the mapping saved.
    ///
    /// `inserted` is the number of new mapping keys.
    fn on_group_complete(&self, base: &str, inserted: usize) {
        let _ = (base, inserted);
    }

    /// Called when a group fails; the batch continues.
    fn on_group_error(&self, base: &str, error: &str) {
        let _ = (base, error);
    }

    /// Called once after the final mapping save.
    fn on_batch_complete(&self, processed: usize, skipped: usize, failed: usize) {
        let _ = (processed, skipped, failed);
    }
}

/// A no-op implementation, used when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

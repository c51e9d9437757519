//! Slide-text extraction: merge PDF page texts into the mapping file.
//!
//! Two entry points:
//!
//! * [`text_extraction`]: one PDF. Pair its page texts with slide image
//!   names, insert the new keys, rewrite the mapping file.
//! * [`text_extract_from_pdfs`]: a whole `downloads/` folder. Group the
//!   slide images in `downloads/images/` by source PDF and run
//!   [`text_extraction`] for each PDF not yet in the mapping.
//!
//! ## Mapping lifecycle
//!
//! The batch driver loads the mapping once, mutates it in memory, rewrites
//! the file after every PDF and once more at the end. A failure in one PDF
//! is logged and recorded; it never aborts the batch.

use crate::config::{pdf_base_name, slide_key, ExtractionConfig};
use crate::error::{GroupFailure, SlideError};
use crate::mapping::SlideTextMap;
use crate::pipeline::text::TextSource;
use crate::progress::{ExtractionProgressCallback, NoopProgressCallback, SkipReason};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `<base>_slide<N>.png`. Anchored at the start only, like a prefix match.
static SLIDE_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_slide\d+\.png").expect("valid slide filename regex"));

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Bases whose texts were merged, in processing order.
    pub processed: Vec<String>,
    /// Bases that were skipped and why.
    pub skipped: Vec<(String, SkipReason)>,
    /// Bases whose extraction failed.
    pub failed: Vec<GroupFailure>,
    /// New mapping keys added across all PDFs.
    pub inserted: usize,
    /// Mapping size after the final save.
    pub total_entries: usize,
}

/// Extract the page texts of `pdf_path` and merge them into `map`.
///
/// Page `i` (1-based) is stored under `{base}_slide{i}.png`, where `base` is
/// the PDF file name without `.pdf`. Only the first `min(images.len(),
/// pages)` pages are paired; the names in `images` are not used beyond
/// their count. Existing keys keep their values. The whole mapping is then
/// written to `mapping_path`.
///
/// Returns the number of keys inserted. If text extraction fails nothing is
/// inserted; if the save fails the insertions stay in `map`.
pub async fn text_extraction(
    pdf_path: impl AsRef<Path>,
    images: &[PathBuf],
    map: &mut SlideTextMap,
    mapping_path: impl AsRef<Path>,
    source: &Arc<dyn TextSource>,
) -> Result<usize, SlideError> {
    let pdf_path = pdf_path.as_ref();
    let base = pdf_base_name(pdf_path);

    let texts = page_texts(source, pdf_path).await?;
    debug!(
        "{}: {} pages of text for {} images",
        base,
        texts.len(),
        images.len()
    );

    let inserted = merge_page_texts(map, &base, images.len(), texts);
    map.save(mapping_path.as_ref())?;

    info!("{}: {} new mapping entries", base, inserted);
    Ok(inserted)
}

/// Insert `{base}_slide{i}.png → text` for the first `image_count` pages.
pub fn merge_page_texts(
    map: &mut SlideTextMap,
    base: &str,
    image_count: usize,
    texts: Vec<Option<String>>,
) -> usize {
    let mut inserted = 0;
    for (i, text) in texts.into_iter().take(image_count).enumerate() {
        if map.insert_if_absent(slide_key(base, i + 1), text) {
            inserted += 1;
        }
    }
    inserted
}

/// Run the blocking [`TextSource`] off the async executor.
async fn page_texts(
    source: &Arc<dyn TextSource>,
    pdf_path: &Path,
) -> Result<Vec<Option<String>>, SlideError> {
    let source = Arc::clone(source);
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || source.page_texts(&path))
        .await
        .map_err(|e| SlideError::Internal(format!("Text extraction task panicked: {}", e)))?
}

/// Group slide images in `images_dir` by the PDF base name in their file name.
///
/// Only `*.png` files (case-insensitive) matching `<base>_slide<N>.png` are
/// kept. Groups are ordered by base name and images within a group by file
/// name, both in natural order (`slide2` before `slide10`).
pub fn group_slide_images(images_dir: &Path) -> Result<Vec<(String, Vec<PathBuf>)>, SlideError> {
    let unreadable = |source: std::io::Error| SlideError::ImagesDirUnreadable {
        path: images_dir.to_path_buf(),
        source,
    };

    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for entry in std::fs::read_dir(images_dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.to_lowercase().ends_with(".png") {
            continue;
        }
        if let Some(caps) = SLIDE_FILE_RE.captures(&name) {
            groups
                .entry(caps[1].to_string())
                .or_default()
                .push(images_dir.join(&name));
        }
    }

    let mut groups: Vec<(String, Vec<PathBuf>)> = groups.into_iter().collect();
    groups.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    for (_, images) in &mut groups {
        images.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    }
    Ok(groups)
}

/// Extract slide texts for every PDF in `config.downloads_dir` that has
/// slide images but no mapping entries yet.
///
/// A group is skipped when any mapping key contains its base name as a
/// substring. Note the prefix collision this implies: an entry
/// `lecture10_slide1.png` also marks `lecture1` as processed.
pub async fn text_extract_from_pdfs(
    config: &ExtractionConfig,
    source: Arc<dyn TextSource>,
) -> Result<BatchReport, SlideError> {
    let noop = NoopProgressCallback;
    let cb: &dyn ExtractionProgressCallback = match config.progress_callback {
        Some(ref cb) => cb.as_ref(),
        None => &noop,
    };

    let mut map = SlideTextMap::load(&config.mapping_path)?;
    let groups = group_slide_images(&config.images_dir())?;
    info!(
        "{} PDF groups in {}, {} existing mapping entries",
        groups.len(),
        config.images_dir().display(),
        map.len()
    );
    cb.on_batch_start(groups.len());

    let mut report = BatchReport::default();

    for (base, images) in groups {
        if map.mentions(&base) {
            info!("Slides for {} already processed. Skipping.", base);
            cb.on_group_skipped(&base, SkipReason::AlreadyProcessed);
            report.skipped.push((base, SkipReason::AlreadyProcessed));
            continue;
        }

        let pdf_path = config.pdf_path(&base);
        if !pdf_path.exists() {
            info!(
                "PDF file {} corresponding to the images not found. Skipping.",
                pdf_path.display()
            );
            cb.on_group_skipped(&base, SkipReason::MissingPdf);
            report.skipped.push((base, SkipReason::MissingPdf));
            continue;
        }

        info!("Processing slides for {}...", base);
        cb.on_group_start(&base, images.len());
        match text_extraction(&pdf_path, &images, &mut map, &config.mapping_path, &source).await {
            Ok(inserted) => {
                cb.on_group_complete(&base, inserted);
                report.inserted += inserted;
                report.processed.push(base);
            }
            Err(e) => {
                warn!("Error processing slides for {}: {}", base, e);
                let detail = e.to_string();
                cb.on_group_error(&base, &detail);
                report.failed.push(GroupFailure { base, detail });
            }
        }
    }

    map.save(&config.mapping_path)?;
    report.total_entries = map.len();

    cb.on_batch_complete(
        report.processed.len(),
        report.skipped.len(),
        report.failed.len(),
    );
    info!(
        "Batch complete: {} processed, {} skipped, {} failed, {} entries",
        report.processed.len(),
        report.skipped.len(),
        report.failed.len(),
        report.total_entries
    );
    Ok(report)
}

/// Human ordering: runs of ASCII digits compare by numeric value.
///
/// `slide2` < `slide10`; ties between equal numbers with different zero
/// padding fall back to plain string order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut x, mut y) = (a, b);
    loop {
        match (x.chars().next(), y.chars().next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(cx), Some(cy)) if cx.is_ascii_digit() && cy.is_ascii_digit() => {
                let (nx, rx) = split_digits(x);
                let (ny, ry) = split_digits(y);
                let (tx, ty) = (nx.trim_start_matches('0'), ny.trim_start_matches('0'));
                let ord = tx.len().cmp(&ty.len()).then_with(|| tx.cmp(ty));
                if ord != Ordering::Equal {
                    return ord;
                }
                x = rx;
                y = ry;
            }
            (Some(cx), Some(cy)) => {
                let ord = cx.to_lowercase().cmp(cy.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                x = &x[cx.len_utf8()..];
                y = &y[cy.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

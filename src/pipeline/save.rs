//! Slide persistence: write rendered pages as numbered PNG files.
//!
//! Width handling follows the slide-deck convention of this crate: with no
//! explicit width, the first slide's own width becomes the width for the
//! whole deck. Later slides with a different native width are scaled to it,
//! each keeping its own aspect ratio.

use crate::config::{pdf_base_name, RenderConfig, SaveOptions, SlideNaming};
use crate::error::SlideError;
use crate::pipeline::render::{load_pdf, SlideImage};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Height that keeps the `orig_w × orig_h` aspect ratio at `width`,
/// rounded to the nearest pixel and never below 1.
pub fn scaled_height(width: u32, orig_w: u32, orig_h: u32) -> u32 {
    if orig_w == 0 {
        return orig_h.max(1);
    }
    let h = (width as f64 * orig_h as f64 / orig_w as f64).round();
    (h as u32).max(1)
}

/// Write `slides` into `out_dir` as PNG files, returning the written paths
/// in slide order.
///
/// The directory is created if absent. Slide `i` (1-based, by position in
/// `slides`) is named by [`SaveOptions::naming`].
pub async fn save_images(
    slides: &[SlideImage],
    out_dir: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<Vec<PathBuf>, SlideError> {
    let out_dir = out_dir.as_ref().to_path_buf();
    let slides = slides.to_vec();
    let options = options.clone();

    tokio::task::spawn_blocking(move || save_images_blocking(&slides, &out_dir, &options))
        .await
        .map_err(|e| SlideError::Internal(format!("Save task panicked: {}", e)))?
}

/// Blocking implementation of [`save_images`].
pub fn save_images_blocking(
    slides: &[SlideImage],
    out_dir: &Path,
    options: &SaveOptions,
) -> Result<Vec<PathBuf>, SlideError> {
    if options.width == Some(0) {
        return Err(SlideError::InvalidConfig("target width must be ≥ 1".into()));
    }

    std::fs::create_dir_all(out_dir).map_err(|source| SlideError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source,
    })?;

    // Set from the first slide when no width was given, then reused.
    let mut width = options.width;
    let mut written = Vec::with_capacity(slides.len());

    for (i, slide) in slides.iter().enumerate() {
        let index = i + 1;
        let target_w = *width.get_or_insert(slide.width());
        let target_h = scaled_height(target_w, slide.width(), slide.height());

        let path = out_dir.join(options.naming.file_name(index));
        let result = if (target_w, target_h) == (slide.width(), slide.height()) {
            slide.image.save_with_format(&path, image::ImageFormat::Png)
        } else {
            slide
                .image
                .resize_exact(target_w, target_h, FilterType::CatmullRom)
                .save_with_format(&path, image::ImageFormat::Png)
        };
        result.map_err(|e| SlideError::ImageWrite {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        debug!(
            "Saved slide {} ({}x{} → {}x{}) to {}",
            index,
            slide.width(),
            slide.height(),
            target_w,
            target_h,
            path.display()
        );
        written.push(path);
    }

    info!("Saved {} slides to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Render `pdf_path` and save its pages as `{base}_slide{N}.png` in `out_dir`.
pub async fn save_pdf_slides(
    pdf_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    width: Option<u32>,
    render: &RenderConfig,
) -> Result<Vec<PathBuf>, SlideError> {
    let pdf_path = pdf_path.as_ref();
    let slides = load_pdf(pdf_path, render).await?;
    let options = SaveOptions {
        width,
        naming: SlideNaming::Prefixed(pdf_base_name(pdf_path)),
    };
    save_images(&slides, out_dir, &options).await
}

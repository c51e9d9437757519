//! PDF rasterisation: render every page to a [`SlideImage`] via pdfium.
//!
//! pdfium keeps thread-local state and blocks for the whole render, so the
//! async entry point moves the work onto tokio's blocking pool with
//! `spawn_blocking`.

use crate::config::RenderConfig;
use crate::error::SlideError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// One rendered PDF page.
#[derive(Debug, Clone)]
pub struct SlideImage {
    /// 1-based page number in the source PDF.
    pub page_number: usize,
    pub image: DynamicImage,
}

impl SlideImage {
    pub fn new(page_number: usize, image: DynamicImage) -> Self {
        Self { page_number, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Bind to a pdfium library.
///
/// Search order: `PDFIUM_LIB_PATH` (path to the library file), the working
/// directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, SlideError> {
    let from_env = std::env::var_os("PDFIUM_LIB_PATH").filter(|p| !p.is_empty());

    let bindings = match from_env {
        Some(path) => Pdfium::bind_to_library(&path)
            .map_err(|e| SlideError::PdfiumBindingFailed(format!("{:?} ({:?})", e, path)))?,
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| SlideError::PdfiumBindingFailed(format!("{:?}", e)))?,
    };

    Ok(Pdfium::new(bindings))
}

/// Fail with [`SlideError::FileNotFound`] before pdfium is even bound.
pub(crate) fn ensure_pdf_exists(pdf_path: &Path) -> Result<(), SlideError> {
    if pdf_path.is_file() {
        Ok(())
    } else {
        Err(SlideError::FileNotFound {
            path: pdf_path.to_path_buf(),
        })
    }
}

/// Open `pdf_path` with pdfium, mapping failures to [`SlideError`].
pub(crate) fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
) -> Result<PdfDocument<'a>, SlideError> {
    pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| SlideError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        })
}

/// Rasterise every page of a PDF, in document order.
///
/// A PDF with N pages yields exactly N images, numbered 1..=N.
pub async fn load_pdf(
    pdf_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<Vec<SlideImage>, SlideError> {
    let path = pdf_path.as_ref().to_path_buf();
    let config = *config;

    tokio::task::spawn_blocking(move || load_pdf_blocking(&path, &config))
        .await
        .map_err(|e| SlideError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of [`load_pdf`].
pub fn load_pdf_blocking(pdf_path: &Path, config: &RenderConfig) -> Result<Vec<SlideImage>, SlideError> {
    ensure_pdf_exists(pdf_path)?;
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} ({} pages)", pdf_path.display(), total_pages);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(config.scale());

    let mut slides = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let page_number = idx + 1;
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| SlideError::RasterisationFailed {
                page: page_number,
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_number,
            image.width(),
            image.height()
        );
        slides.push(SlideImage::new(page_number, image));
    }

    Ok(slides)
}

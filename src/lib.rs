//! # slide-vlm
//!
//! Helpers for working with slide decks and hosted vision-language models.
//!
//! ## What it does
//!
//! * **Prompt a vision model** with an image and a question: one operation,
//!   [`VisionClient::prompt`], parameterised by a [`VisionModel`].
//! * **Turn a PDF deck into slides**: render every page ([`load_pdf`]),
//!   write numbered PNGs ([`save_images`]), and keep a persisted mapping from
//!   slide image name to the slide's text ([`text_extraction`],
//!   [`text_extract_from_pdfs`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! downloads/talk.pdf
//!  │
//!  ├─ 1. Render   rasterise pages via pdfium (spawn_blocking)
//!  ├─ 2. Save     downloads/images/talk_slide{N}.png
//!  ├─ 3. Text     per-page text layer, in document order
//!  └─ 4. Merge    dict_slides_text.yml: talk_slide{N}.png → text
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slide_vlm::{
//!     save_pdf_slides, text_extract_from_pdfs, ExtractionConfig, PdfiumTextSource,
//!     RenderConfig, VisionClient, VisionConfig, VisionModel,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     save_pdf_slides("downloads/talk.pdf", "downloads/images", Some(1024), &RenderConfig::default()).await?;
//!
//!     let report = text_extract_from_pdfs(&ExtractionConfig::default(), Arc::new(PdfiumTextSource)).await?;
//!     eprintln!("{} PDFs merged", report.processed.len());
//!
//!     // Reads GITHUB_TOKEN
//!     let client = VisionClient::from_env(VisionConfig::default())?;
//!     let answer = client
//!         .prompt("downloads/images/talk_slide1.png", "Summarise this slide.", &VisionModel::Gpt4o)
//!         .await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `slide-vlm` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod vision;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    pdf_base_name, slide_key, ExtractionConfig, ExtractionConfigBuilder, ImageDetail,
    RenderConfig, SaveOptions, SlideNaming, VisionConfig, VisionConfigBuilder,
};
pub use error::{GroupFailure, SlideError};
pub use extract::{text_extract_from_pdfs, text_extraction, BatchReport};
pub use mapping::SlideTextMap;
pub use models::VisionModel;
pub use pipeline::render::{load_pdf, SlideImage};
pub use pipeline::save::{save_images, save_pdf_slides};
pub use pipeline::text::{PdfiumTextSource, TextSource};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback, SkipReason};
pub use vision::{prompt_model, VisionClient};

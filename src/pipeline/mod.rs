//! Pipeline stages for slide handling.
//!
//! Each submodule implements exactly one step.
//!
//! ```text
//! PDF ──▶ render ──▶ save            (PNG slides on disk)
//!   └───▶ text   ──▶ crate::extract  (filename → text mapping)
//! image file ──▶ encode ──▶ crate::vision
//! ```
//!
//! 1. [`render`] — rasterise every page via pdfium (`spawn_blocking`)
//! 2. [`save`]   — resize and write numbered PNG files
//! 3. [`text`]   — read each page's text layer behind the [`text::TextSource`] seam
//! 4. [`encode`] — PNG-encode and base64-wrap an image for a model request

pub mod encode;
pub mod render;
pub mod save;
pub mod text;

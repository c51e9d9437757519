//! Configuration types.
//!
//! Three independent configs, one per concern:
//!
//! * [`VisionConfig`] — where and how image prompts are sent.
//! * [`RenderConfig`] / [`SaveOptions`] — how PDF pages become PNG slides.
//! * [`ExtractionConfig`] — where the batch driver looks for slides and
//!   where the mapping file lives.
//!
//! Each has a `Default` matching the conventional layout (`downloads/`,
//! `downloads/images/`, `dict_slides_text.yml`) and a builder that validates.

use crate::error::SlideError;
use crate::progress::ProgressCallback;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default inference endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://models.inference.ai.azure.com";

/// Default name of the environment variable holding the bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Default mapping file name.
pub const DEFAULT_MAPPING_FILE: &str = "dict_slides_text.yml";

// ── Vision ───────────────────────────────────────────────────────────────

/// Resolution hint sent with the image part of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    /// Single low-resolution overview tile. (default)
    #[default]
    Low,
    High,
    Auto,
}

/// Configuration for prompting hosted vision models.
///
/// # Example
/// ```rust
/// use slide_vlm::{ImageDetail, VisionConfig};
///
/// let config = VisionConfig::builder()
///     .endpoint("http://localhost:8080")
///     .detail(ImageDetail::High)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint, "http://localhost:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Base URL of the OpenAI-compatible endpoint. `/chat/completions` is appended.
    pub endpoint: String,

    /// Environment variable read by [`crate::vision::VisionClient::from_env`].
    pub token_env: String,

    /// System message sent before the user's text and image.
    pub system_prompt: String,

    /// Image detail level. Default: [`ImageDetail::Low`].
    pub detail: ImageDetail,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            detail: ImageDetail::default(),
        }
    }
}

impl VisionConfig {
    pub fn builder() -> VisionConfigBuilder {
        VisionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the chat-completions route.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

/// Builder for [`VisionConfig`].
#[derive(Debug)]
pub struct VisionConfigBuilder {
    config: VisionConfig,
}

impl VisionConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn token_env(mut self, var: impl Into<String>) -> Self {
        self.config.token_env = var.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn detail(mut self, detail: ImageDetail) -> Self {
        self.config.detail = detail;
        self
    }

    pub fn build(self) -> Result<VisionConfig, SlideError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(SlideError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got '{}'",
                c.endpoint
            )));
        }
        if c.token_env.trim().is_empty() {
            return Err(SlideError::InvalidConfig(
                "token environment variable name is empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// How PDF pages are rasterised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Rendering DPI. Range: 36–600. Default: 200.
    pub dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { dpi: 200 }
    }
}

impl RenderConfig {
    pub fn new(dpi: u32) -> Result<Self, SlideError> {
        if !(36..=600).contains(&dpi) {
            return Err(SlideError::InvalidConfig(format!(
                "DPI must be 36–600, got {}",
                dpi
            )));
        }
        Ok(Self { dpi })
    }

    /// pdfium scale factor (PDF user space is 72 points per inch).
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

/// How slide PNG files are named.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideNaming {
    /// `slide{N}.png` (default).
    #[default]
    Numbered,
    /// `{base}_slide{N}.png`, where `base` is the PDF base name.
    Prefixed(String),
}

impl SlideNaming {
    /// File name for the 1-based slide `index`.
    pub fn file_name(&self, index: usize) -> String {
        match self {
            SlideNaming::Numbered => format!("slide{}.png", index),
            SlideNaming::Prefixed(base) => slide_key(base, index),
        }
    }
}

/// Mapping key / image file name for page `index` of the PDF `base`.
pub fn slide_key(base: &str, index: usize) -> String {
    format!("{}_slide{}.png", base, index)
}

/// PDF file name without directory and without a trailing `.pdf`
/// (case-insensitive).
pub fn pdf_base_name(pdf_path: &Path) -> String {
    let name = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cut = name.len().saturating_sub(4);
    if name.len() >= 4 && name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") {
        name[..cut].to_string()
    } else {
        name
    }
}

/// Options for [`crate::pipeline::save::save_images`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Target width. `None` keeps the first slide's width for every slide.
    pub width: Option<u32>,

    /// File naming scheme.
    pub naming: SlideNaming,
}

// ── Extraction ───────────────────────────────────────────────────────────

/// Configuration for [`crate::extract::text_extract_from_pdfs`].
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Folder holding the PDFs and the images subfolder. Default: `downloads`.
    pub downloads_dir: PathBuf,

    /// Images subfolder name inside `downloads_dir`. Default: `images`.
    pub images_subdir: String,

    /// Mapping file, loaded once and rewritten after every PDF. Default: `dict_slides_text.yml`.
    pub mapping_path: PathBuf,

    /// Optional observer for per-PDF events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            images_subdir: "images".to_string(),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_FILE),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("downloads_dir", &self.downloads_dir)
            .field("images_subdir", &self.images_subdir)
            .field("mapping_path", &self.mapping_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// `downloads_dir/images_subdir`.
    pub fn images_dir(&self) -> PathBuf {
        self.downloads_dir.join(&self.images_subdir)
    }

    /// Expected location of the PDF for a group `base`.
    pub fn pdf_path(&self, base: &str) -> PathBuf {
        self.downloads_dir.join(format!("{}.pdf", base))
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn downloads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.downloads_dir = dir.into();
        self
    }

    pub fn images_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.images_subdir = name.into();
        self
    }

    pub fn mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mapping_path = path.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<ExtractionConfig, SlideError> {
        if self.config.images_subdir.trim().is_empty() {
            return Err(SlideError::InvalidConfig("images subfolder name is empty".into()));
        }
        if self.config.mapping_path.as_os_str().is_empty() {
            return Err(SlideError::InvalidConfig("mapping path is empty".into()));
        }
        Ok(self.config)
    }
}

//! Error types for the slide-vlm library.
//!
//! Every fallible operation returns [`SlideError`]. The batch driver is the
//! only place where errors are tolerated: a failure while extracting one
//! PDF is logged and recorded in [`crate::extract::BatchReport`] as a
//! [`GroupFailure`], and the remaining PDFs are still processed.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the slide-vlm library.
#[derive(Debug, Error)]
pub enum SlideError {
    // ── Credential / endpoint errors ──────────────────────────────────────
    /// The environment variable holding the bearer token is unset or empty.
    #[error("Environment variable '{var}' is not set.\nExport a token for the inference endpoint, e.g. export {var}=...")]
    MissingCredential { var: String },

    /// The HTTP request could not be sent or the response body not read.
    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("Model API error for '{model}' (HTTP {status}): {body}")]
    ApiError {
        model: String,
        status: u16,
        body: String,
    },

    /// The endpoint answered without a usable first choice.
    #[error("Model '{model}' returned no content in its first choice")]
    EmptyResponse { model: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The image file could not be read.
    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image bytes are not in a decodable format.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    /// A rendered or loaded image could not be written as PNG.
    #[error("Failed to write PNG '{path}': {detail}")]
    ImageWrite { path: PathBuf, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// Input PDF was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// pdfium could not open the document.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error while rendering a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// pdfium returned an error while reading a page's text layer.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the working directory, install it system-wide,\n\
or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Mapping / directory errors ────────────────────────────────────────
    /// The mapping file exists but could not be read.
    #[error("Failed to read mapping file '{path}': {source}")]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping file is not a YAML mapping of strings.
    #[error("Mapping file '{path}' is malformed: {detail}")]
    MappingParse { path: PathBuf, detail: String },

    /// Could not create or write an output file or directory.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slide images directory could not be listed.
    #[error("Cannot list images directory '{path}': {source}")]
    ImagesDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure for one PDF group in a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error("{base}: {detail}")]
pub struct GroupFailure {
    /// PDF base name of the failed group.
    pub base: String,
    /// Rendered error message.
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_variable() {
        let e = SlideError::MissingCredential {
            var: "GITHUB_TOKEN".into(),
        };
        assert!(e.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn api_error_display() {
        let e = SlideError::ApiError {
            model: "gpt-4o".into(),
            status: 401,
            body: "bad credentials".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gpt-4o"), "got: {msg}");
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("bad credentials"), "got: {msg}");
    }

    #[test]
    fn rasterisation_display() {
        let e = SlideError::RasterisationFailed {
            page: 3,
            detail: "oom".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }

    #[test]
    fn group_failure_display() {
        let f = GroupFailure {
            base: "talk".into(),
            detail: "PDF 'downloads/talk.pdf' could not be opened".into(),
        };
        assert!(f.to_string().starts_with("talk: "));
    }
}

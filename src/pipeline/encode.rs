//! Image encoding: image file → base64 PNG data URL for the request body.
//!
//! The image is decoded and re-encoded as PNG whatever its source format,
//! so the `image/png` label in the data URL is always truthful.

use crate::error::SlideError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode a decoded image as a `data:image/png;base64,…` URL.
pub fn encode_png_data_url(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(format!("data:image/png;base64,{}", b64))
}

/// Read, decode and PNG-encode the image at `path`.
pub async fn load_image_data_url(path: &Path) -> Result<String, SlideError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SlideError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;

    let img = image::load_from_memory(&bytes).map_err(|e| SlideError::ImageDecode {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    encode_png_data_url(&img).map_err(|e| SlideError::ImageDecode {
        path: path.to_path_buf(),
        detail: format!("PNG encoding failed: {}", e),
    })
}

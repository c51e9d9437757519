//! Rendering and text extraction through a real pdfium library.
//!
//! Skipped when no pdfium library can be bound. Run with:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test pdf -- --nocapture

use slide_vlm::pipeline::render::bind_pdfium;
use slide_vlm::{
    load_pdf, save_pdf_slides, text_extract_from_pdfs, ExtractionConfig, PdfiumTextSource,
    RenderConfig, SlideError, SlideTextMap, TextSource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

macro_rules! skip_unless_pdfium {
    () => {
        if let Err(e) = bind_pdfium() {
            println!("SKIP — {}", e.to_string().lines().next().unwrap_or_default());
            return;
        }
    };
}

/// Write a minimal PDF with one 144x108 pt page per entry of `pages`; each
/// page shows its string in Helvetica (an empty string leaves the page blank).
fn write_pdf(path: &Path, pages: &[&str]) {
    let n = pages.len();
    // Objects: 1 catalog, 2 pages, 3 font, then (page, content) pairs.
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        n
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".into());
    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 144 108] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 10 50 Td ({text}) Tj ET")
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for off in offsets {
        out.push_str(&format!("{:010} 00000 n \n", off));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    std::fs::write(path, out).unwrap();
}

fn png_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_pdf_is_reported_without_pdfium() {
    let dir = TempDir::new().unwrap();
    let err = load_pdf(dir.path().join("absent.pdf"), &RenderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SlideError::FileNotFound { .. }), "got: {err}");
}

#[tokio::test]
async fn one_image_per_page_in_order() {
    skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("deck.pdf");
    write_pdf(&pdf, &["First", "Second", "Third"]);

    let slides = load_pdf(&pdf, &RenderConfig::new(72).unwrap()).await.unwrap();
    assert_eq!(slides.len(), 3);
    for (i, slide) in slides.iter().enumerate() {
        assert_eq!(slide.page_number, i + 1);
        assert_eq!((slide.width(), slide.height()), (144, 108));
    }

    let hi = load_pdf(&pdf, &RenderConfig::new(144).unwrap()).await.unwrap();
    assert_eq!((hi[0].width(), hi[0].height()), (288, 216));
}

#[tokio::test]
async fn garbage_file_is_corrupt() {
    skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("junk.pdf");
    std::fs::write(&pdf, b"this is not a pdf").unwrap();

    let err = load_pdf(&pdf, &RenderConfig::default()).await.unwrap_err();
    assert!(matches!(err, SlideError::CorruptPdf { .. }), "got: {err}");
}

#[tokio::test]
async fn save_pdf_slides_writes_prefixed_pngs() {
    skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("talk.pdf");
    write_pdf(&pdf, &["A", "B"]);
    let out: PathBuf = dir.path().join("images");

    let paths = save_pdf_slides(&pdf, &out, Some(72), &RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(paths.len(), 2);
    assert_eq!(png_names(&out), vec!["talk_slide1.png", "talk_slide2.png"]);
    let img = image::open(&paths[0]).unwrap();
    // 144x108 page at width 72 keeps the 4:3 aspect ratio.
    assert_eq!((img.width(), img.height()), (72, 54));
}

#[test]
fn pdfium_reads_page_texts() {
    skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("deck.pdf");
    write_pdf(&pdf, &["Hello slides", "", "Goodbye"]);

    let texts = PdfiumTextSource.page_texts(&pdf).unwrap();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].as_deref().unwrap_or_default().contains("Hello slides"));
    assert_eq!(texts[1], None);
    assert!(texts[2].as_deref().unwrap_or_default().contains("Goodbye"));
}

#[tokio::test]
async fn render_then_extract_full_run() {
    skip_unless_pdfium!();
    let dir = TempDir::new().unwrap();
    let downloads = dir.path().join("downloads");
    std::fs::create_dir_all(&downloads).unwrap();
    let pdf = downloads.join("talk.pdf");
    write_pdf(&pdf, &["Intro", "Results"]);

    save_pdf_slides(&pdf, downloads.join("images"), None, &RenderConfig::new(72).unwrap())
        .await
        .unwrap();

    let mapping = dir.path().join("dict_slides_text.yml");
    let config = ExtractionConfig::builder()
        .downloads_dir(&downloads)
        .mapping_path(&mapping)
        .build()
        .unwrap();
    let report = text_extract_from_pdfs(&config, Arc::new(PdfiumTextSource))
        .await
        .unwrap();
    assert_eq!(report.processed, vec!["talk".to_string()]);

    let map = SlideTextMap::load(&mapping).unwrap();
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["talk_slide1.png", "talk_slide2.png"]);
    assert!(map.get("talk_slide2.png").unwrap().as_deref().unwrap().contains("Results"));
}

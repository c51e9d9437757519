//! Batch extraction over a `downloads/` tree, driven by an in-memory text
//! source so no pdfium library is needed.

use slide_vlm::{
    text_extract_from_pdfs, ExtractionConfig, ExtractionProgressCallback, SkipReason,
    SlideError, SlideTextMap, TextSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Page texts keyed by PDF file name; `broken.pdf` always fails.
struct FakePdfs;

impl TextSource for FakePdfs {
    fn page_texts(&self, pdf_path: &Path) -> Result<Vec<Option<String>>, SlideError> {
        let name = pdf_path.file_name().unwrap().to_string_lossy().into_owned();
        match name.as_str() {
            "talk.pdf" => Ok(vec![Some("Intro".into()), Some("Results".into())]),
            "lecture1.pdf" => Ok(vec![Some("Week one".into())]),
            "short.pdf" => Ok(vec![Some("Only page".into()), None, Some("Extra".into())]),
            "broken.pdf" => Err(SlideError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: "not a PDF".into(),
            }),
            other => panic!("unexpected PDF {other}"),
        }
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl ExtractionProgressCallback for Recorder {
    fn on_batch_start(&self, total: usize) {
        self.0.lock().unwrap().push(format!("start {total}"));
    }
    fn on_group_skipped(&self, base: &str, reason: SkipReason) {
        self.0.lock().unwrap().push(format!("skip {base} ({reason})"));
    }
    fn on_group_start(&self, base: &str, images: usize) {
        self.0.lock().unwrap().push(format!("begin {base} {images}"));
    }
    fn on_group_complete(&self, base: &str, inserted: usize) {
        self.0.lock().unwrap().push(format!("done {base} +{inserted}"));
    }
    fn on_group_error(&self, base: &str, _error: &str) {
        self.0.lock().unwrap().push(format!("error {base}"));
    }
    fn on_batch_complete(&self, processed: usize, skipped: usize, failed: usize) {
        self.0
            .lock()
            .unwrap()
            .push(format!("end {processed}/{skipped}/{failed}"));
    }
}

struct Downloads {
    _dir: TempDir,
    root: PathBuf,
}

impl Downloads {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("downloads");
        fs::create_dir_all(root.join("images")).unwrap();
        Self { _dir: dir, root }
    }

    fn pdf(&self, base: &str) -> &Self {
        fs::write(self.root.join(format!("{base}.pdf")), b"%PDF-1.4\n").unwrap();
        self
    }

    fn slides(&self, base: &str, n: usize) -> &Self {
        for i in 1..=n {
            fs::write(self.root.join("images").join(format!("{base}_slide{i}.png")), b"").unwrap();
        }
        self
    }

    fn mapping(&self) -> PathBuf {
        self.root.parent().unwrap().join("dict_slides_text.yml")
    }

    fn config(&self) -> ExtractionConfig {
        ExtractionConfig::builder()
            .downloads_dir(&self.root)
            .mapping_path(self.mapping())
            .build()
            .unwrap()
    }
}

#[tokio::test]
async fn merges_texts_of_one_deck() {
    let dl = Downloads::new();
    dl.pdf("talk").slides("talk", 2);

    let report = text_extract_from_pdfs(&dl.config(), Arc::new(FakePdfs))
        .await
        .unwrap();

    assert_eq!(report.processed, vec!["talk".to_string()]);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.total_entries, 2);

    let map = SlideTextMap::load(&dl.mapping()).unwrap();
    let pairs: Vec<(&str, Option<&str>)> = map.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("talk_slide1.png", Some("Intro")),
            ("talk_slide2.png", Some("Results"))
        ]
    );
}

#[tokio::test]
async fn second_run_skips_already_processed_deck() {
    let dl = Downloads::new();
    dl.pdf("talk").slides("talk", 2);
    let config = dl.config();

    text_extract_from_pdfs(&config, Arc::new(FakePdfs)).await.unwrap();
    let before = fs::read_to_string(dl.mapping()).unwrap();

    let report = text_extract_from_pdfs(&config, Arc::new(FakePdfs)).await.unwrap();
    assert!(report.processed.is_empty());
    assert_eq!(
        report.skipped,
        vec![("talk".to_string(), SkipReason::AlreadyProcessed)]
    );
    assert_eq!(fs::read_to_string(dl.mapping()).unwrap(), before);
}

#[tokio::test]
async fn substring_match_marks_prefix_deck_as_processed() {
    let dl = Downloads::new();
    dl.pdf("lecture1").slides("lecture1", 1);

    let mut existing = SlideTextMap::new();
    existing.insert_if_absent("lecture10_slide1.png", Some("Week ten".into()));
    existing.save(&dl.mapping()).unwrap();

    let report = text_extract_from_pdfs(&dl.config(), Arc::new(FakePdfs))
        .await
        .unwrap();

    assert_eq!(
        report.skipped,
        vec![("lecture1".to_string(), SkipReason::AlreadyProcessed)]
    );
    let map = SlideTextMap::load(&dl.mapping()).unwrap();
    assert!(!map.contains_key("lecture1_slide1.png"));
}

#[tokio::test]
async fn images_without_pdf_are_skipped() {
    let dl = Downloads::new();
    dl.slides("orphan", 3);

    let report = text_extract_from_pdfs(&dl.config(), Arc::new(FakePdfs))
        .await
        .unwrap();

    assert_eq!(
        report.skipped,
        vec![("orphan".to_string(), SkipReason::MissingPdf)]
    );
    assert_eq!(report.total_entries, 0);
    // The final save still writes the (empty) mapping.
    assert!(SlideTextMap::load(&dl.mapping()).unwrap().is_empty());
}

#[tokio::test]
async fn pairs_only_as_many_pages_as_images() {
    let dl = Downloads::new();
    dl.pdf("short").slides("short", 2);

    text_extract_from_pdfs(&dl.config(), Arc::new(FakePdfs))
        .await
        .unwrap();

    let map = SlideTextMap::load(&dl.mapping()).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("short_slide2.png"), Some(&None));
    assert!(!map.contains_key("short_slide3.png"));
}

#[tokio::test]
async fn one_failing_pdf_does_not_abort_the_batch() {
    let dl = Downloads::new();
    dl.pdf("broken").slides("broken", 1);
    dl.pdf("talk").slides("talk", 2);
    dl.slides("orphan", 1);

    let recorder = Arc::new(Recorder::default());
    let config = ExtractionConfig::builder()
        .downloads_dir(&dl.root)
        .mapping_path(dl.mapping())
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let report = text_extract_from_pdfs(&config, Arc::new(FakePdfs))
        .await
        .unwrap();

    assert_eq!(report.processed, vec!["talk".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].base, "broken");
    assert!(report.failed[0].detail.contains("not a PDF"));

    let events = recorder.0.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "start 3",
            "begin broken 1",
            "error broken",
            "skip orphan (PDF not found)",
            "begin talk 2",
            "done talk +2",
            "end 1/1/1",
        ]
    );

    let map = SlideTextMap::load(&dl.mapping()).unwrap();
    assert_eq!(map.len(), 2);
    assert!(!map.keys().any(|k| k.starts_with("broken")));
}

#[tokio::test]
async fn missing_images_folder_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = ExtractionConfig::builder()
        .downloads_dir(dir.path().join("nowhere"))
        .mapping_path(dir.path().join("map.yml"))
        .build()
        .unwrap();

    let err = text_extract_from_pdfs(&config, Arc::new(FakePdfs))
        .await
        .unwrap_err();
    assert!(matches!(err, SlideError::ImagesDirUnreadable { .. }));
}

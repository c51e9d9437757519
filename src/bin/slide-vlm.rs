//! CLI binary for slide-vlm.
//!
//! A thin shim over the library crate that maps subcommands and flags to
//! the library's config builders and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use slide_vlm::{
    load_pdf, pdf_base_name, save_images, text_extract_from_pdfs, ExtractionConfig,
    ExtractionProgressCallback, ImageDetail, PdfiumTextSource, ProgressCallback, RenderConfig,
    SaveOptions, SkipReason, SlideNaming, VisionClient, VisionConfig, VisionModel,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Batch progress callback using indicatif ──────────────────────────────────

/// Terminal progress for `extract`: one bar tick per PDF group and one log
/// line per decision.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} PDFs  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_groups: usize) {
        self.bar.set_length(total_groups as u64);
    }

    fn on_group_skipped(&self, base: &str, reason: SkipReason) {
        self.bar
            .println(format!("  {} {:<32} {}", dim("·"), base, dim(&reason.to_string())));
        self.bar.inc(1);
    }

    fn on_group_start(&self, base: &str, image_count: usize) {
        self.bar.set_message(format!("{base} ({image_count} slides)"));
    }

    fn on_group_complete(&self, base: &str, inserted: usize) {
        self.bar.println(format!(
            "  {} {:<32} {}",
            green("✓"),
            base,
            dim(&format!("+{inserted} entries"))
        ));
        self.bar.inc(1);
    }

    fn on_group_error(&self, base: &str, error: &str) {
        let msg = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {:<32} {}", red("✗"), base, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _processed: usize, _skipped: usize, _failed: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ask a model about a slide
  slide-vlm prompt --image downloads/images/talk_slide1.png --model gpt-4o "What is this slide about?"

  # Render a deck to downloads/images/talk_slide{N}.png at 1024 px width
  slide-vlm render downloads/talk.pdf -o downloads/images --width 1024

  # Merge slide texts of every rendered deck into dict_slides_text.yml
  slide-vlm extract --downloads downloads --mapping dict_slides_text.yml

  # List model identifiers
  slide-vlm models

ENVIRONMENT VARIABLES:
  GITHUB_TOKEN            Bearer token for the inference endpoint
  SLIDE_VLM_ENDPOINT      Override the inference endpoint URL
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  RUST_LOG                Log filter (overrides --verbose / --quiet)
"#;

/// Prompt vision models with slide images and turn PDF decks into slides.
#[derive(Parser, Debug)]
#[command(
    name = "slide-vlm",
    version,
    about = "Prompt vision models with slide images and turn PDF decks into slides",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SLIDE_VLM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SLIDE_VLM_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send an image and a prompt to a hosted vision model.
    Prompt {
        /// Prompt text.
        prompt: String,

        /// Image file to send (re-encoded as PNG).
        #[arg(short, long)]
        image: PathBuf,

        /// Model identifier or alias (see `slide-vlm models`).
        #[arg(short, long, env = "SLIDE_VLM_MODEL", default_value = "gpt-4o")]
        model: VisionModel,

        /// Inference endpoint base URL.
        #[arg(long, env = "SLIDE_VLM_ENDPOINT", default_value = slide_vlm::config::DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Environment variable holding the bearer token.
        #[arg(long, default_value = slide_vlm::config::DEFAULT_TOKEN_ENV)]
        token_env: String,

        /// Path to a text file containing a custom system prompt.
        #[arg(long)]
        system_prompt: Option<PathBuf>,

        /// Image detail level.
        #[arg(long, value_enum, default_value = "low")]
        detail: DetailArg,
    },

    /// Render a PDF into numbered PNG slides.
    Render {
        /// PDF file to render.
        pdf: PathBuf,

        /// Output directory.
        #[arg(short, long, default_value = "downloads/images")]
        output: PathBuf,

        /// Target width in pixels; default keeps the first slide's width.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: Option<u32>,

        /// Rendering DPI (36–600).
        #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u32).range(36..=600))]
        dpi: u32,

        /// Name files slide{N}.png instead of {pdf}_slide{N}.png.
        #[arg(long)]
        numbered: bool,
    },

    /// Merge slide texts of every rendered PDF into the mapping file.
    Extract {
        /// Folder holding the PDFs and the images subfolder.
        #[arg(long, env = "SLIDE_VLM_DOWNLOADS", default_value = "downloads")]
        downloads: PathBuf,

        /// Images subfolder name.
        #[arg(long, default_value = "images")]
        images_subdir: String,

        /// Mapping file.
        #[arg(long, env = "SLIDE_VLM_MAPPING", default_value = slide_vlm::config::DEFAULT_MAPPING_FILE)]
        mapping: PathBuf,

        /// Disable progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// List the supported model identifiers.
    Models,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum DetailArg {
    Low,
    High,
    Auto,
}

impl From<DetailArg> for ImageDetail {
    fn from(v: DetailArg) -> Self {
        match v {
            DetailArg::Low => ImageDetail::Low,
            DetailArg::High => ImageDetail::High,
            DetailArg::Auto => ImageDetail::Auto,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Prompt {
            prompt,
            image,
            model,
            endpoint,
            token_env,
            system_prompt,
            detail,
        } => {
            let mut builder = VisionConfig::builder()
                .endpoint(endpoint)
                .token_env(token_env)
                .detail(detail.into());
            if let Some(path) = system_prompt {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
                builder = builder.system_prompt(text);
            }
            let config = builder.build().context("Invalid configuration")?;

            let client = VisionClient::from_env(config)?;
            let answer = client
                .prompt(&image, &prompt, &model)
                .await
                .with_context(|| format!("Prompting {} failed", model))?;
            println!("{answer}");
        }

        Command::Render {
            pdf,
            output,
            width,
            dpi,
            numbered,
        } => {
            let render = RenderConfig::new(dpi)?;
            let slides = load_pdf(&pdf, &render)
                .await
                .with_context(|| format!("Failed to render {}", pdf.display()))?;

            let naming = if numbered {
                SlideNaming::Numbered
            } else {
                SlideNaming::Prefixed(pdf_base_name(&pdf))
            };
            let paths = save_images(&slides, &output, &SaveOptions { width, naming })
                .await
                .context("Failed to save slides")?;

            if !cli.quiet {
                eprintln!(
                    "{} {} slides  →  {}",
                    green("✔"),
                    bold(&paths.len().to_string()),
                    bold(&output.display().to_string())
                );
            }
        }

        Command::Extract {
            downloads,
            images_subdir,
            mapping,
            no_progress,
        } => {
            let mut builder = ExtractionConfig::builder()
                .downloads_dir(downloads)
                .images_subdir(images_subdir)
                .mapping_path(&mapping);
            if !cli.quiet && !no_progress {
                let cb: ProgressCallback = CliProgressCallback::new();
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;

            let report = text_extract_from_pdfs(&config, Arc::new(PdfiumTextSource))
                .await
                .context("Text extraction failed")?;

            if !cli.quiet {
                eprintln!(
                    "{}  {} merged, {} skipped, {} failed  →  {} ({} entries, +{})",
                    if report.failed.is_empty() {
                        green("✔")
                    } else {
                        red("⚠")
                    },
                    report.processed.len(),
                    report.skipped.len(),
                    report.failed.len(),
                    bold(&mapping.display().to_string()),
                    report.total_entries,
                    report.inserted,
                );
            }
        }

        Command::Models => {
            for model in VisionModel::ALL {
                println!("{:<32} {}", model.id(), dim(model.alias()));
            }
        }
    }

    Ok(())
}

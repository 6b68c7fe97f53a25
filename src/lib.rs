//! # edgequake-html2pdf
//!
//! Convert an HTML document (plus an optional stylesheet) to PDF with
//! [WeasyPrint](https://weasyprint.org/), installing the engine with `pip`
//! the first time it is needed.
//!
//! Layout, CSS and PDF generation are entirely WeasyPrint's job. This crate
//! only decides *whether* a conversion can happen and reports clearly when it
//! cannot, so the user can fall back to "print to PDF" in a browser.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML (+ CSS)
//!  │
//!  ├─ 1. Input       HTML must exist; stylesheet read if present
//!  ├─ 2. Dependency  injected renderer, or WeasyPrint probed / pip-installed once
//!  ├─ 3. Render      engine writes a hidden temp file off the async executor
//!  └─ 4. Output      %PDF verified, persisted onto the output path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_html2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // PROJECT_PORTFOLIO.html + pdf-style.css → PROJECT_PORTFOLIO.pdf
//!     let config = ConversionConfig::default();
//!     let output = convert(&config).await?;
//!     eprintln!("{} bytes written to {}", output.pdf_bytes, output.pdf_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Bringing your own renderer
//!
//! Implement [`PdfRenderer`] and pass it with
//! [`ConversionConfigBuilder::renderer`]; WeasyPrint is then never probed or
//! installed.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `html2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod guidance;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod renderer;
pub mod weasyprint;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, DEFAULT_CSS_FILE, DEFAULT_HTML_FILE,
    DEFAULT_PDF_FILE,
};
pub use convert::{check_renderer, convert, convert_sync};
pub use error::{FailureStage, Html2PdfError, RenderError};
pub use output::{ConversionOutput, DependencyStatus};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use renderer::PdfRenderer;
pub use weasyprint::WeasyPrintRenderer;

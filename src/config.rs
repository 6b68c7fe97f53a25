//! Configuration types for HTML-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the portfolio
//! workflow exactly: `PROJECT_PORTFOLIO.html` + optional `pdf-style.css` in the
//! working directory, rendered to `PROJECT_PORTFOLIO.pdf`, with WeasyPrint
//! installed on demand.

use crate::error::Html2PdfError;
use crate::progress::ProgressCallback;
use crate::renderer::PdfRenderer;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use weasyprint_auto::LocateOptions;

/// HTML input used when none is configured.
pub const DEFAULT_HTML_FILE: &str = "PROJECT_PORTFOLIO.html";

/// Stylesheet applied when present.
pub const DEFAULT_CSS_FILE: &str = "pdf-style.css";

/// PDF output written on success.
pub const DEFAULT_PDF_FILE: &str = "PROJECT_PORTFOLIO.pdf";

/// Configuration for an HTML-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_html2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .html_path("site/index.html")
///     .pdf_path("site/index.pdf")
///     .no_stylesheet()
///     .auto_install(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// HTML document to convert. Must already exist. Default: `PROJECT_PORTFOLIO.html`.
    pub html_path: PathBuf,

    /// Stylesheet applied when the file exists and is non-empty.
    /// `None` disables stylesheet lookup entirely. Default: `pdf-style.css`.
    pub css_path: Option<PathBuf>,

    /// Where the PDF is written. Overwritten without prompt. Default: `PROJECT_PORTFOLIO.pdf`.
    pub pdf_path: PathBuf,

    /// Run `pip install weasyprint` when the engine is missing. Default: true.
    ///
    /// The install is attempted at most once per conversion. It mutates the
    /// Python environment the interpreter belongs to.
    pub auto_install: bool,

    /// Where to look for WeasyPrint and which Python/pip to use.
    pub weasyprint: LocateOptions,

    /// Pre-constructed renderer. When set, no probe or install happens.
    pub renderer: Option<Arc<dyn PdfRenderer>>,

    /// Optional stage-event callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from(DEFAULT_HTML_FILE),
            css_path: Some(PathBuf::from(DEFAULT_CSS_FILE)),
            pdf_path: PathBuf::from(DEFAULT_PDF_FILE),
            auto_install: true,
            weasyprint: LocateOptions::default(),
            renderer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("html_path", &self.html_path)
            .field("css_path", &self.css_path)
            .field("pdf_path", &self.pdf_path)
            .field("auto_install", &self.auto_install)
            .field("weasyprint", &self.weasyprint)
            .field("renderer", &self.renderer.as_ref().map(|r| r.name().to_string()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn html_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.html_path = path.into();
        self
    }

    pub fn css_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.css_path = Some(path.into());
        self
    }

    /// Never look for a stylesheet.
    pub fn no_stylesheet(mut self) -> Self {
        self.config.css_path = None;
        self
    }

    pub fn pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdf_path = path.into();
        self
    }

    pub fn auto_install(mut self, v: bool) -> Self {
        self.config.auto_install = v;
        self
    }

    pub fn weasyprint_program(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.weasyprint.program = Some(path.into());
        self
    }

    pub fn python(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.weasyprint.python = Some(path.into());
        self
    }

    pub fn pip_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.weasyprint.pip_args.push(arg.into());
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Html2PdfError> {
        let c = &self.config;
        if c.html_path.as_os_str().is_empty() {
            return Err(Html2PdfError::InvalidConfig("HTML path must not be empty".into()));
        }
        if c.pdf_path.as_os_str().is_empty() {
            return Err(Html2PdfError::InvalidConfig("PDF path must not be empty".into()));
        }
        if c.pdf_path == c.html_path {
            return Err(Html2PdfError::InvalidConfig(format!(
                "PDF output would overwrite the HTML input '{}'",
                c.html_path.display()
            )));
        }
        if c.css_path.as_ref() == Some(&c.pdf_path) {
            return Err(Html2PdfError::InvalidConfig(format!(
                "PDF output would overwrite the stylesheet '{}'",
                c.pdf_path.display()
            )));
        }
        Ok(self.config)
    }
}

//! Progress-callback trait for conversion stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! when the engine is being installed and when rendering starts and ends.
//! Installing WeasyPrint can take a minute on a cold pip cache, so a front
//! end usually wants to show something while it happens.
//!
//! # Example
//!
//! ```rust
//! use edgequake_html2pdf::{ConversionConfig, ConversionProgressCallback};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl ConversionProgressCallback for Log {
//!     fn on_render_complete(&self, pdf: &Path, bytes: u64) {
//!         eprintln!("wrote {} ({bytes} bytes)", pdf.display());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Log) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipeline as it moves between stages.
///
/// Implementations must be `Send + Sync`: install and render events are
/// fired from blocking worker threads. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called just before the package installer runs.
    fn on_install_start(&self, package: &str) {
        let _ = package;
    }

    /// Called after the installer finished, successful or not.
    fn on_install_complete(&self, package: &str, success: bool) {
        let _ = (package, success);
    }

    /// Called just before the renderer is invoked.
    fn on_render_start(&self, html: &Path) {
        let _ = html;
    }

    /// Called once the PDF is in place.
    ///
    /// # Arguments
    /// * `pdf`   — final output path
    /// * `bytes` — size of the written PDF
    fn on_render_complete(&self, pdf: &Path, bytes: u64) {
        let _ = (pdf, bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

//! The rendering capability, as an injectable trait.
//!
//! The pipeline never talks to WeasyPrint directly: it asks for an
//! `Arc<dyn PdfRenderer>` and calls [`PdfRenderer::render`]. Where that
//! renderer comes from (caller-supplied, already installed, installed on
//! demand) is decided in [`crate::pipeline::dependency`].

use crate::error::RenderError;
use std::path::Path;

/// Something that turns an HTML file (plus optional CSS) into a PDF file.
///
/// `render` is blocking; the pipeline calls it from `spawn_blocking`.
pub trait PdfRenderer: Send + Sync {
    /// Short human-readable name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Render `html` to `output`, applying `stylesheet` when given.
    ///
    /// `stylesheet` is the CSS *content*, not a path. `output` may already
    /// exist and must be overwritten.
    fn render(
        &self,
        html: &Path,
        stylesheet: Option<&str>,
        output: &Path,
    ) -> Result<(), RenderError>;
}

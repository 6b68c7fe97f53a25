//! Render stage: run the renderer and put a verified PDF at the output path.
//!
//! The renderer writes to a uniquely named hidden file next to the output
//! (`.html2pdf-XXXXXX.pdf`). Only when that file starts with the `%PDF` magic
//! bytes is it persisted onto the output path, so a failed run never leaves a
//! truncated PDF behind, never clobbers the previous good one, and never
//! touches any other file in the directory. Re-running with the same inputs
//! simply replaces the output.

use crate::error::Html2PdfError;
use crate::renderer::PdfRenderer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Render `html` (with optional CSS content) to `pdf_path`.
///
/// Returns the size of the written PDF in bytes.
pub async fn render_to_pdf(
    renderer: Arc<dyn PdfRenderer>,
    html: &Path,
    stylesheet: Option<String>,
    pdf_path: &Path,
) -> Result<u64, Html2PdfError> {
    let write_failed = |e: std::io::Error| Html2PdfError::OutputWriteFailed {
        path: pdf_path.to_path_buf(),
        source: e,
    };

    let dir = match pdf_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
            parent
        }
        None => Path::new("."),
    };

    // Removed on drop, so every early return below cleans up.
    let staging = staging_file(dir).map_err(write_failed)?;
    debug!("Staging PDF at {}", staging.display());

    let name = renderer.name().to_string();
    info!("Converting {} to PDF using {}…", html.display(), name);

    let html_owned = html.to_path_buf();
    let staging_owned = staging.to_path_buf();
    let result = tokio::task::spawn_blocking(move || {
        renderer.render(&html_owned, stylesheet.as_deref(), &staging_owned)
    })
    .await
    .map_err(|e| Html2PdfError::Internal(format!("Render task panicked: {}", e)))?;

    if let Err(e) = result {
        return Err(Html2PdfError::RenderFailed {
            renderer: name,
            detail: e.to_string(),
        });
    }

    let magic = read_magic(&staging)
        .await
        .map_err(|e| Html2PdfError::RenderFailed {
            renderer: name.clone(),
            detail: format!("renderer reported success but its output is unreadable: {e}"),
        })?;
    if magic != PDF_MAGIC {
        return Err(Html2PdfError::NotAPdf {
            path: pdf_path.to_path_buf(),
            magic,
        });
    }

    staging
        .persist(pdf_path)
        .map_err(|e| write_failed(e.error))?;

    let bytes = tokio::fs::metadata(pdf_path)
        .await
        .map(|m| m.len())
        .map_err(write_failed)?;

    info!("PDF created successfully: {} ({} bytes)", pdf_path.display(), bytes);
    Ok(bytes)
}

/// A fresh, empty, uniquely named file in `dir` for the renderer to fill.
///
/// The handle is closed straight away; only the path is kept.
fn staging_file(dir: &Path) -> std::io::Result<TempPath> {
    Ok(tempfile::Builder::new()
        .prefix(".html2pdf-")
        .suffix(".pdf")
        .tempfile_in(dir)?
        .into_temp_path())
}

/// First four bytes of `path` (fewer if the file is shorter).
async fn read_magic(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut f = tokio::fs::File::open(path).await?;
    let mut buf = Vec::with_capacity(PDF_MAGIC.len());
    (&mut f).take(PDF_MAGIC.len() as u64).read_to_end(&mut buf).await?;
    Ok(buf)
}

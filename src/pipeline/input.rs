//! Input checks: the HTML document must exist, the stylesheet may.
//!
//! Only existence and readability are checked here. The HTML itself is never
//! parsed by this crate; malformed markup is the renderer's problem and
//! surfaces as a render failure.

use crate::error::Html2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A stylesheet that was found and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub path: PathBuf,
    pub content: String,
}

/// Verify that the HTML input exists and can be opened.
pub fn check_html(path: &Path) -> Result<(), Html2PdfError> {
    if !path.is_file() {
        return Err(Html2PdfError::HtmlNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Html2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Html2PdfError::HtmlNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved HTML input: {}", path.display());
    Ok(())
}

/// Read the stylesheet if one is configured and present.
///
/// Returns `Ok(None)` when no path is configured, the file does not exist, or
/// the file is empty. A file that exists but cannot be read as UTF-8 is an
/// error.
pub async fn read_stylesheet(path: Option<&Path>) -> Result<Option<Stylesheet>, Html2PdfError> {
    let Some(path) = path else {
        return Ok(None);
    };

    if !path.exists() {
        debug!("No stylesheet at {}; rendering without one", path.display());
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Html2PdfError::StylesheetUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

    if content.is_empty() {
        debug!("Stylesheet {} is empty; ignoring it", path.display());
        return Ok(None);
    }

    debug!("Read stylesheet {} ({} bytes)", path.display(), content.len());
    Ok(Some(Stylesheet {
        path: path.to_path_buf(),
        content,
    }))
}

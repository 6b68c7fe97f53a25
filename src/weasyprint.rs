//! [`PdfRenderer`] backed by the WeasyPrint command-line tool.
//!
//! The stylesheet arrives as CSS text, but the CLI only accepts stylesheet
//! *files*, so the text is written to a managed [`tempfile`] for the duration
//! of the call. The invocation is
//!
//! ```text
//! <launcher> [--stylesheet <tmp.css>] <html> <output>
//! ```

use crate::error::RenderError;
use crate::renderer::PdfRenderer;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tracing::{debug, warn};
use weasyprint_auto::{describe_status, tail_lines, Launcher};

/// Number of stderr lines kept in a [`RenderError::EngineFailed`].
const STDERR_TAIL_LINES: usize = 20;

/// Renders through a resolved WeasyPrint [`Launcher`].
#[derive(Debug, Clone)]
pub struct WeasyPrintRenderer {
    launcher: Launcher,
}

impl WeasyPrintRenderer {
    pub fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }
}

impl PdfRenderer for WeasyPrintRenderer {
    fn name(&self) -> &str {
        "WeasyPrint"
    }

    fn render(
        &self,
        html: &Path,
        stylesheet: Option<&str>,
        output: &Path,
    ) -> Result<(), RenderError> {
        let mut cmd = self.launcher.command();

        // Kept alive until the engine exits.
        let css_file = match stylesheet {
            Some(css) => {
                let mut f = tempfile::Builder::new()
                    .prefix("html2pdf-")
                    .suffix(".css")
                    .tempfile()?;
                f.write_all(css.as_bytes())?;
                f.flush()?;
                cmd.arg("--stylesheet").arg(f.path());
                Some(f)
            }
            None => None,
        };

        cmd.arg(html).arg(output).stdin(Stdio::null());
        debug!("Running {:?}", cmd);

        let result = cmd.output().map_err(|e| RenderError::Spawn {
            program: self.launcher.program.display().to_string(),
            source: e,
        })?;
        drop(css_file);

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() {
            return Err(RenderError::EngineFailed {
                status: describe_status(result.status),
                stderr: tail_lines(&stderr, STDERR_TAIL_LINES),
            });
        }

        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!("weasyprint: {}", line);
        }
        Ok(())
    }
}

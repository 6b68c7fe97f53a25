//! Result types returned by a successful conversion.

use serde::Serialize;
use std::path::PathBuf;

/// How the rendering engine was obtained for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    /// The caller supplied a renderer; no probe or install happened.
    Injected,
    /// The engine was already usable.
    AlreadyInstalled,
    /// The engine was installed during this run.
    Installed,
}

/// Report of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The PDF that was written.
    pub pdf_path: PathBuf,
    /// The HTML source it was rendered from.
    pub html_path: PathBuf,
    /// The stylesheet that was applied, if any.
    pub stylesheet: Option<PathBuf>,
    /// Name of the renderer, e.g. "WeasyPrint".
    pub renderer: String,
    /// Engine version, when known.
    pub renderer_version: Option<String>,
    /// How the engine was obtained for this run.
    pub dependency: DependencyStatus,
    /// Size of the written PDF.
    pub pdf_bytes: u64,
    /// Wall-clock time of the whole conversion.
    pub duration_ms: u64,
}

impl ConversionOutput {
    /// Files involved in the conversion, output first.
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files = vec![&self.pdf_path, &self.html_path];
        if let Some(ref css) = self.stylesheet {
            files.push(css);
        }
        files
    }
}

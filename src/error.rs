//! Error types for the edgequake-html2pdf library.
//!
//! Two error types reflect two layers:
//!
//! * [`Html2PdfError`] — **Fatal** for a conversion: the PDF was not
//!   produced. Returned as `Err(Html2PdfError)` from [`crate::convert`].
//!
//! * [`RenderError`] — what a [`crate::renderer::PdfRenderer`] reports when
//!   the engine itself fails. The pipeline wraps it into
//!   [`Html2PdfError::RenderFailed`] together with the renderer name.
//!
//! Every fatal error belongs to one [`FailureStage`]. The CLI picks the
//! guidance it prints (pandoc hint vs. manual browser instructions) and its
//! exit code from the stage alone.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-html2pdf library.
#[derive(Debug, Error)]
pub enum Html2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The HTML input was not found at the given path.
    #[error("HTML file not found: '{path}'")]
    HtmlNotFound { path: PathBuf },

    /// The HTML input exists but cannot be opened.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Dependency errors ─────────────────────────────────────────────────
    /// The rendering engine is missing and could not be installed.
    #[error("{package} is not available: {reason}")]
    DependencyUnavailable { package: String, reason: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The stylesheet exists but could not be read as UTF-8 text.
    #[error("Failed to read stylesheet '{path}': {source}")]
    StylesheetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendering engine failed.
    #[error("Error converting to PDF with {renderer}: {detail}")]
    RenderFailed { renderer: String, detail: String },

    /// The engine finished, but what it wrote is not a PDF.
    #[error("Renderer output is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    /// Could not move the rendered PDF into place.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage a fatal error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The HTML input is absent or unreadable.
    MissingInput,
    /// No rendering engine could be found or installed.
    Dependency,
    /// The engine was available but conversion failed.
    Render,
}

impl FailureStage {
    /// Process exit code for this stage (sysexits.h conventions).
    pub fn exit_code(self) -> u8 {
        match self {
            FailureStage::MissingInput => 66, // EX_NOINPUT
            FailureStage::Dependency => 69,   // EX_UNAVAILABLE
            FailureStage::Render => 70,       // EX_SOFTWARE
        }
    }
}

impl Html2PdfError {
    /// Classify the error into the stage that produced it.
    pub fn stage(&self) -> FailureStage {
        match self {
            Html2PdfError::HtmlNotFound { .. } | Html2PdfError::PermissionDenied { .. } => {
                FailureStage::MissingInput
            }
            Html2PdfError::DependencyUnavailable { .. } => FailureStage::Dependency,
            Html2PdfError::StylesheetUnreadable { .. }
            | Html2PdfError::RenderFailed { .. }
            | Html2PdfError::NotAPdf { .. }
            | Html2PdfError::OutputWriteFailed { .. }
            | Html2PdfError::InvalidConfig(_)
            | Html2PdfError::Internal(_) => FailureStage::Render,
        }
    }
}

/// A failure reported by a [`crate::renderer::PdfRenderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine process could not be started.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and exited unsuccessfully.
    #[error("engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    /// Any other I/O failure around the render call.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Renderer-specific failure with a free-form message.
    #[error("{0}")]
    Other(String),
}

//! Conversion entry points.
//!
//! [`convert`] runs the three stages in order (input → dependency → render)
//! and stops at the first failure. Nothing is retried: a missing input, a
//! missing engine, or a failed render each end the conversion with an error
//! the caller turns into guidance.

use crate::config::ConversionConfig;
use crate::error::Html2PdfError;
use crate::output::ConversionOutput;
use crate::pipeline::{dependency, input, render};
use std::time::Instant;
use tracing::{debug, info};
use weasyprint_auto::PACKAGE;

/// Convert the configured HTML document to PDF.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`Html2PdfError::HtmlNotFound`] / [`Html2PdfError::PermissionDenied`]
///   when the HTML input is absent; nothing else is attempted.
/// - [`Html2PdfError::DependencyUnavailable`] when no renderer is injected and
///   WeasyPrint can be neither found nor installed.
/// - [`Html2PdfError::RenderFailed`] and friends when the engine fails; any
///   existing output PDF is left untouched.
pub async fn convert(config: &ConversionConfig) -> Result<ConversionOutput, Html2PdfError> {
    let start = Instant::now();
    info!("Starting conversion: {}", config.html_path.display());

    // ── Step 1: HTML must exist ──────────────────────────────────────────
    input::check_html(&config.html_path)?;

    // ── Step 2: Get/install renderer ─────────────────────────────────────
    let acquired = dependency::acquire_renderer(config).await?;
    debug!(
        "Renderer {} ({:?})",
        acquired.renderer.name(),
        acquired.status
    );

    // ── Step 3: Optional stylesheet ──────────────────────────────────────
    let stylesheet = input::read_stylesheet(config.css_path.as_deref()).await?;
    let (stylesheet_path, css) = match stylesheet {
        Some(s) => (Some(s.path), Some(s.content)),
        None => (None, None),
    };

    // ── Step 4: Render ───────────────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(&config.html_path);
    }
    let renderer_name = acquired.renderer.name().to_string();
    let pdf_bytes = render::render_to_pdf(
        acquired.renderer,
        &config.html_path,
        css,
        &config.pdf_path,
    )
    .await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(&config.pdf_path, pdf_bytes);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} in {}ms",
        config.pdf_path.display(),
        duration_ms
    );

    Ok(ConversionOutput {
        pdf_path: config.pdf_path.clone(),
        html_path: config.html_path.clone(),
        stylesheet: stylesheet_path,
        renderer: renderer_name,
        renderer_version: acquired.version,
        dependency: acquired.status,
        pdf_bytes,
        duration_ms,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(config: &ConversionConfig) -> Result<ConversionOutput, Html2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Html2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(config))
}

/// Report which renderer a conversion would use, without installing or
/// converting anything.
pub async fn check_renderer(config: &ConversionConfig) -> Result<String, Html2PdfError> {
    if let Some(ref renderer) = config.renderer {
        return Ok(renderer.name().to_string());
    }

    match dependency::probe_renderer(config).await? {
        Some(launcher) => Ok(format!("WeasyPrint via {launcher}")),
        None => Err(Html2PdfError::DependencyUnavailable {
            package: PACKAGE.to_string(),
            reason: "not found (installation not attempted)".to_string(),
        }),
    }
}

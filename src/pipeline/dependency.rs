//! Renderer acquisition: the "optional dependency, installed on demand" step.
//!
//! Resolution, from most-specific to least-specific:
//!
//! 1. **Injected renderer** (`config.renderer`) — used as-is. Nothing is
//!    probed or installed.
//! 2. **Installed engine** — [`weasyprint_auto::probe`] finds a usable
//!    `weasyprint` executable or `python -m weasyprint`.
//! 3. **Install on demand** — when `config.auto_install` is set, `pip install
//!    weasyprint` runs once and the probe is repeated.
//!
//! If none of these yields a renderer the conversion stops with
//! [`Html2PdfError::DependencyUnavailable`]. Probing and pip are blocking
//! subprocess calls, so they run inside `spawn_blocking`.

use crate::config::ConversionConfig;
use crate::error::Html2PdfError;
use crate::output::DependencyStatus;
use crate::renderer::PdfRenderer;
use crate::weasyprint::WeasyPrintRenderer;
use std::sync::Arc;
use tracing::{info, warn};
use weasyprint_auto::{Acquisition, InstallPhase, Launcher, WeasyPrintAutoError, PACKAGE};

/// A renderer ready for use, and how it was obtained.
pub struct AcquiredRenderer {
    pub renderer: Arc<dyn PdfRenderer>,
    pub status: DependencyStatus,
    pub version: Option<String>,
}

/// Resolve the renderer for this conversion, installing WeasyPrint if allowed.
pub async fn acquire_renderer(config: &ConversionConfig) -> Result<AcquiredRenderer, Html2PdfError> {
    if let Some(ref renderer) = config.renderer {
        return Ok(AcquiredRenderer {
            renderer: Arc::clone(renderer),
            status: DependencyStatus::Injected,
            version: None,
        });
    }

    let opts = config.weasyprint.clone();
    let auto_install = config.auto_install;
    let progress = config.progress_callback.clone();

    let acquisition = tokio::task::spawn_blocking(move || {
        if !auto_install {
            return weasyprint_auto::probe(&opts)
                .map(Acquisition::Found)
                .ok_or(None::<WeasyPrintAutoError>);
        }

        let on_install = |phase: InstallPhase| match phase {
            InstallPhase::Started => {
                info!("{} not found. Installing with pip…", PACKAGE);
                if let Some(ref cb) = progress {
                    cb.on_install_start(PACKAGE);
                }
            }
            InstallPhase::Succeeded | InstallPhase::Failed => {
                let ok = phase == InstallPhase::Succeeded;
                if ok {
                    info!("{} installed successfully", PACKAGE);
                } else {
                    warn!("Failed to install {}", PACKAGE);
                }
                if let Some(ref cb) = progress {
                    cb.on_install_complete(PACKAGE, ok);
                }
            }
        };

        weasyprint_auto::ensure_weasyprint(&opts, Some(&on_install)).map_err(Some)
    })
    .await
    .map_err(|e| Html2PdfError::Internal(format!("Dependency task panicked: {}", e)))?;

    match acquisition {
        Ok(acq) => {
            let status = if acq.was_installed() {
                DependencyStatus::Installed
            } else {
                DependencyStatus::AlreadyInstalled
            };
            let launcher = acq.into_launcher();
            info!("Using {}", launcher);
            Ok(AcquiredRenderer {
                version: launcher.version.clone(),
                renderer: Arc::new(WeasyPrintRenderer::new(launcher)),
                status,
            })
        }
        Err(cause) => Err(unavailable(cause)),
    }
}

/// Probe for the engine without installing anything.
pub async fn probe_renderer(config: &ConversionConfig) -> Result<Option<Launcher>, Html2PdfError> {
    let opts = config.weasyprint.clone();
    tokio::task::spawn_blocking(move || weasyprint_auto::probe(&opts))
        .await
        .map_err(|e| Html2PdfError::Internal(format!("Probe task panicked: {}", e)))
}

/// `None` means the engine is missing and installation was not attempted.
fn unavailable(cause: Option<WeasyPrintAutoError>) -> Html2PdfError {
    let reason = match cause {
        Some(e) => e.to_string(),
        None => "not found and automatic installation is disabled".to_string(),
    };
    Html2PdfError::DependencyUnavailable {
        package: PACKAGE.to_string(),
        reason,
    }
}

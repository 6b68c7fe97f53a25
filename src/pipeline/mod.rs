//! Pipeline stages for HTML-to-PDF conversion.
//!
//! Each submodule implements exactly one step, and each step either hands
//! its result to the next or stops the whole conversion with an
//! [`crate::error::Html2PdfError`] whose [`crate::error::FailureStage`]
//! tells the caller what guidance to print.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ dependency ──▶ input (css) ──▶ render
//! (html?)   (probe/pip)    (optional)      (engine → tmp → %PDF → persist)
//! ```
//!
//! 1. [`input`]      — the HTML must exist; the stylesheet is read if present
//! 2. [`dependency`] — injected renderer, or WeasyPrint probed / installed once
//! 3. [`render`]     — run the renderer off the async executor and move the
//!    verified PDF into place

pub mod dependency;
pub mod input;
pub mod render;

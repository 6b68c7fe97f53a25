//! User-facing guidance printed when automated conversion is not possible.
//!
//! Kept as plain text so front ends (the CLI, a GUI, a CI log) can print it
//! verbatim, and so tests can check the wording without running anything.

use std::path::Path;

/// The platform's print shortcut, e.g. "Cmd+P" on macOS.
pub fn print_shortcut() -> &'static str {
    if cfg!(target_os = "macos") {
        "Cmd+P"
    } else {
        "Ctrl+P"
    }
}

/// Step-by-step instructions for converting `html` by hand in a browser.
pub fn manual_instructions(html: &Path) -> String {
    format!(
        "1. Open {} in your browser\n\
         2. Press {} (Print)\n\
         3. Select 'Save as PDF'\n\
         4. Choose appropriate settings and save",
        html.display(),
        print_shortcut()
    )
}

/// How to regenerate the HTML input from its Markdown source with pandoc.
///
/// Assumes the Markdown sits next to the HTML with the same stem.
pub fn regenerate_html_hint(html: &Path, css: Option<&Path>) -> String {
    let markdown = html.with_extension("md");
    let mut cmd = format!(
        "pandoc {} -o {}",
        markdown.display(),
        html.display()
    );
    if let Some(css) = css {
        cmd.push_str(&format!(" --css={}", css.display()));
    }
    cmd.push_str(" --standalone --toc --toc-depth=3");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_instructions_have_four_steps() {
        let text = manual_instructions(Path::new("PROJECT_PORTFOLIO.html"));
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Open PROJECT_PORTFOLIO.html in your browser"));
        assert!(text.contains("Save as PDF"));
        assert!(text.contains(print_shortcut()));
    }

    #[test]
    fn pandoc_hint_for_defaults() {
        let hint = regenerate_html_hint(
            Path::new("PROJECT_PORTFOLIO.html"),
            Some(Path::new("pdf-style.css")),
        );
        assert_eq!(
            hint,
            "pandoc PROJECT_PORTFOLIO.md -o PROJECT_PORTFOLIO.html --css=pdf-style.css \
             --standalone --toc --toc-depth=3"
        );
    }

    #[test]
    fn pandoc_hint_without_css() {
        let hint = regenerate_html_hint(Path::new("doc.html"), None);
        assert!(!hint.contains("--css"));
        assert!(hint.starts_with("pandoc doc.md -o doc.html"));
    }
}

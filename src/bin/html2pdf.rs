//! CLI binary for edgequake-html2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion, and turns each failure stage into
//! the matching user guidance and exit code.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_html2pdf::{
    check_renderer, convert, guidance, ConversionConfig, ConversionOutput,
    ConversionProgressCallback, FailureStage, Html2PdfError, ProgressCallback, DEFAULT_CSS_FILE,
    DEFAULT_HTML_FILE, DEFAULT_PDF_FILE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single spinner that covers the slow stages
/// (pip install, rendering) and leaves one log line behind for each.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self { bar })
    }

    fn start(&self, prefix: &'static str, msg: String) {
        self.bar.set_prefix(prefix);
        self.bar.set_message(msg);
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_install_start(&self, package: &str) {
        self.bar.println(format!(
            "{} {} not found. Installing…",
            cyan("📦"),
            bold(package)
        ));
        self.start("Installing", format!("pip install {package}"));
    }

    fn on_install_complete(&self, package: &str, success: bool) {
        self.bar.disable_steady_tick();
        self.bar.set_message("");
        if success {
            self.bar
                .println(format!("{} {package} installed successfully!", green("✅")));
        } else {
            self.bar
                .println(format!("{} Failed to install {package}", red("❌")));
            self.bar.finish_and_clear();
        }
    }

    fn on_render_start(&self, html: &Path) {
        self.start("Converting", format!("{} → PDF", html.display()));
    }

    fn on_render_complete(&self, pdf: &Path, bytes: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} PDF created successfully: {}  {}",
            green("✅"),
            bold(&pdf.display().to_string()),
            dim(&format!("{bytes} bytes"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert PROJECT_PORTFOLIO.html (+ pdf-style.css) → PROJECT_PORTFOLIO.pdf
  html2pdf

  # Other files
  html2pdf --html report.html --css print.css -o report.pdf

  # Never touch the Python environment
  html2pdf --no-install

  # Install into the user site-packages
  html2pdf --pip-arg=--user

  # Is the engine available?
  html2pdf --check

  # Machine-readable report on stdout
  html2pdf --json

EXIT CODES:
  0   PDF written
  66  HTML input missing or unreadable
  69  WeasyPrint unavailable and could not be installed
  70  Conversion failed

ENVIRONMENT VARIABLES:
  HTML2PDF_HTML / HTML2PDF_CSS / HTML2PDF_OUTPUT   Override the file paths
  WEASYPRINT_BIN          Path to a weasyprint executable (probed exclusively)
  WEASYPRINT_PYTHON       Python interpreter for `-m weasyprint` and pip
                          (takes precedence over `weasyprint` on PATH)
  RUST_LOG                Log filter, e.g. RUST_LOG=debug

SETUP:
  WeasyPrint is installed with `python -m pip install weasyprint` the first
  time it is needed. If that fails, html2pdf prints manual browser
  instructions instead.
"#;

/// Convert an HTML document to PDF with WeasyPrint.
#[derive(Parser, Debug)]
#[command(
    name = "html2pdf",
    version,
    about = "Convert an HTML document to PDF with WeasyPrint, installing it on demand",
    long_about = "Convert an HTML document (and optional stylesheet) to PDF using WeasyPrint. \
If WeasyPrint is missing it is installed with pip; if that is impossible, step-by-step \
instructions for printing to PDF from a browser are shown instead.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML document to convert.
    #[arg(long, env = "HTML2PDF_HTML", default_value = DEFAULT_HTML_FILE)]
    html: PathBuf,

    /// Stylesheet applied when present.
    #[arg(long, env = "HTML2PDF_CSS", default_value = DEFAULT_CSS_FILE)]
    css: PathBuf,

    /// Do not apply any stylesheet.
    #[arg(long, conflicts_with = "css")]
    no_css: bool,

    /// PDF file to write (overwritten without prompt).
    #[arg(short, long, env = "HTML2PDF_OUTPUT", default_value = DEFAULT_PDF_FILE)]
    output: PathBuf,

    /// Do not pip-install WeasyPrint when it is missing.
    #[arg(long, env = "HTML2PDF_NO_INSTALL")]
    no_install: bool,

    /// Python interpreter used for `-m weasyprint` and pip. When set,
    /// `weasyprint` on PATH is not used.
    #[arg(long, env = "HTML2PDF_PYTHON")]
    python: Option<PathBuf>,

    /// Explicit weasyprint executable.
    #[arg(long, env = "WEASYPRINT_BIN")]
    weasyprint: Option<PathBuf>,

    /// Extra argument for `pip install` (repeatable), e.g. --pip-arg=--user.
    #[arg(long = "pip-arg", value_name = "ARG", allow_hyphen_values = true)]
    pip_args: Vec<String>,

    /// Only report whether the engine is available; convert nothing.
    #[arg(long)]
    check: bool,

    /// Print a JSON report on stdout.
    #[arg(long, env = "HTML2PDF_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "HTML2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HTML2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "HTML2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already narrates each stage; keep library INFO logs quiet
    // while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<ExitCode> {
    let chatty = !cli.quiet && !cli.json;
    if chatty {
        eprintln!("{} {}", cyan("🚀"), bold("HTML to PDF Converter"));
        eprintln!("{}", "=".repeat(40));
    }

    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .clone()
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);
    let config = build_config(cli, progress_cb)?;

    // ── Check-only mode ──────────────────────────────────────────────────
    if cli.check {
        return match check_renderer(&config).await {
            Ok(description) => {
                if cli.json {
                    print_json(&serde_json::json!({ "available": true, "renderer": description }))?;
                } else {
                    println!("{description}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => report_failure(cli, &config, &e),
        };
    }

    // ── Run conversion ───────────────────────────────────────────────────
    match convert(&config).await {
        Ok(output) => {
            if cli.json {
                print_json(&output)?;
            } else if !cli.quiet {
                print_summary(&output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let Some(ref cb) = spinner {
                cb.bar.finish_and_clear();
            }
            report_failure(cli, &config, &e)
        }
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .html_path(&cli.html)
        .pdf_path(&cli.output)
        .auto_install(!cli.no_install);

    builder = if cli.no_css {
        builder.no_stylesheet()
    } else {
        builder.css_path(&cli.css)
    };
    if let Some(ref py) = cli.python {
        builder = builder.python(py);
    }
    if let Some(ref bin) = cli.weasyprint {
        builder = builder.weasyprint_program(bin);
    }
    for arg in &cli.pip_args {
        builder = builder.pip_arg(arg);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the diagnostic and guidance for a failed stage; pick the exit code.
fn report_failure(cli: &Cli, config: &ConversionConfig, err: &Html2PdfError) -> Result<ExitCode> {
    let stage = err.stage();

    if cli.json {
        print_json(&serde_json::json!({
            "error": err.to_string(),
            "stage": stage,
        }))?;
    }

    eprintln!("{} {}", red("❌"), err);
    match stage {
        FailureStage::MissingInput => {
            eprintln!(
                "Please run: {}",
                guidance::regenerate_html_hint(&config.html_path, config.css_path.as_deref())
            );
        }
        FailureStage::Dependency => {
            eprintln!("\n{} Alternative method: Manual conversion", cyan("🔄"));
            eprintln!("{}", guidance::manual_instructions(&config.html_path));
        }
        FailureStage::Render => {
            eprintln!("\n{} Manual conversion required:", cyan("🔄"));
            eprintln!("{}", guidance::manual_instructions(&config.html_path));
        }
    }

    Ok(ExitCode::from(stage.exit_code()))
}

fn print_summary(output: &ConversionOutput) {
    eprintln!("\n{} Conversion completed successfully!", green("🎉"));
    eprintln!("📁 Files created:");
    eprintln!(
        "   - {} {}",
        bold(&output.pdf_path.display().to_string()),
        dim(&format!("(PDF, {} bytes)", output.pdf_bytes))
    );
    eprintln!("   - {} {}", output.html_path.display(), dim("(source)"));
    if let Some(ref css) = output.stylesheet {
        eprintln!("   - {} {}", css.display(), dim("(styling)"));
    }
    let engine = match output.renderer_version {
        Some(ref v) => format!("{} {v}", output.renderer),
        None => output.renderer.clone(),
    };
    eprintln!(
        "   {}",
        dim(&format!("{engine}, {}ms total", output.duration_ms))
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialise output")?
    );
    Ok(())
}

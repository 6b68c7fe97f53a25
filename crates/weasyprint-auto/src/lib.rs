//! # weasyprint-auto
//!
//! Locate the [WeasyPrint](https://weasyprint.org/) HTML-to-PDF engine, and
//! install it with `pip` when it is missing, so that callers never have to
//! tell users "go install this Python package first".
//!
//! ## How it works
//!
//! [`probe`] looks for a usable engine, in order:
//!
//! 1. An explicit program (`LocateOptions::program`, else `WEASYPRINT_BIN`).
//!    When set, it is the *only* candidate.
//! 2. An explicit interpreter (`LocateOptions::python`, else
//!    `WEASYPRINT_PYTHON`): only `<python> -m weasyprint` is tried, so the
//!    engine always comes from the environment pip installs into.
//! 3. Otherwise `weasyprint` on `PATH`, then `<python> -m weasyprint` for
//!    `python3` and `python`.
//!
//! A candidate is usable when `--version` exits successfully. Probing has no
//! side effects.
//!
//! [`install_weasyprint`] runs `<python> -m pip install weasyprint` and
//! [`ensure_weasyprint`] chains the two: probe, install once if needed, probe
//! again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use weasyprint_auto::{ensure_weasyprint, LocateOptions};
//!
//! let acquired = ensure_weasyprint(&LocateOptions::default(), None)
//!     .expect("WeasyPrint unavailable");
//! let status = acquired
//!     .launcher()
//!     .command()
//!     .args(["report.html", "report.pdf"])
//!     .status()
//!     .expect("failed to spawn");
//! assert!(status.success());
//! ```
//!
//! ## Environment variable overrides
//!
//! - `WEASYPRINT_BIN` — path to a `weasyprint` executable; probed exclusively.
//! - `WEASYPRINT_PYTHON` — Python interpreter used for `-m weasyprint` and `pip`.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// The package name handed to `pip install`.
pub const PACKAGE: &str = "weasyprint";

/// Python module name used for the `python -m` fallback.
const MODULE: &str = "weasyprint";

/// Interpreters tried when no explicit Python is configured.
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Number of stderr lines kept when an install fails.
const STDERR_TAIL_LINES: usize = 12;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by weasyprint-auto operations.
#[derive(Error, Debug)]
pub enum WeasyPrintAutoError {
    /// No Python interpreter could be started, so `pip` cannot run.
    #[error("No usable Python interpreter found (tried: {tried})")]
    NoPython { tried: String },

    /// The installer process could not be spawned.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `pip install` ran but exited unsuccessfully.
    #[error("pip install {package} failed ({status})\n{stderr}")]
    InstallFailed {
        package: String,
        status: String,
        stderr: String,
    },

    /// pip reported success, yet no usable engine can be found afterwards.
    #[error("{package} was installed but cannot be launched from this environment")]
    StillUnavailable { package: String },
}

// ── Options ──────────────────────────────────────────────────────────────────

/// Where to look for WeasyPrint and how to install it.
///
/// Every field is optional; the default searches `PATH` and the usual Python
/// interpreters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocateOptions {
    /// Explicit `weasyprint` executable. Probed exclusively when set.
    pub program: Option<PathBuf>,
    /// Explicit Python interpreter for `-m weasyprint` and `-m pip`. When set,
    /// `weasyprint` on `PATH` is not considered.
    pub python: Option<PathBuf>,
    /// Extra arguments appended to `pip install`, e.g. `--user`.
    pub pip_args: Vec<String>,
}

impl LocateOptions {
    fn program_override(&self) -> Option<PathBuf> {
        self.program
            .clone()
            .or_else(|| env_path("WEASYPRINT_BIN"))
    }

    fn python_override(&self) -> Option<PathBuf> {
        self.python
            .clone()
            .or_else(|| env_path("WEASYPRINT_PYTHON"))
    }

    fn python_candidates(&self) -> Vec<PathBuf> {
        match self.python_override() {
            Some(p) => vec![p],
            None => PYTHON_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

// ── Launcher ─────────────────────────────────────────────────────────────────

/// A resolved way of invoking the engine: `program [args…] <caller args>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    /// Executable to spawn (`weasyprint` or a Python interpreter).
    pub program: PathBuf,
    /// Leading arguments, e.g. `["-m", "weasyprint"]`.
    pub args: Vec<String>,
    /// Engine version reported by `--version`, if it could be parsed.
    pub version: Option<String>,
}

impl Launcher {
    fn direct(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            version: None,
        }
    }

    fn python_module(python: PathBuf) -> Self {
        Self {
            program: python,
            args: vec!["-m".to_string(), MODULE.to_string()],
            version: None,
        }
    }

    /// A fresh [`Command`] with the program and leading args already applied.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(ref v) = self.version {
            write!(f, " (version {v})")?;
        }
        Ok(())
    }
}

/// How [`ensure_weasyprint`] obtained its launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The engine was already usable.
    Found(Launcher),
    /// The engine was installed by this call.
    Installed(Launcher),
}

impl Acquisition {
    pub fn launcher(&self) -> &Launcher {
        match self {
            Acquisition::Found(l) | Acquisition::Installed(l) => l,
        }
    }

    pub fn into_launcher(self) -> Launcher {
        match self {
            Acquisition::Found(l) | Acquisition::Installed(l) => l,
        }
    }

    pub fn was_installed(&self) -> bool {
        matches!(self, Acquisition::Installed(_))
    }
}

/// Phases reported by [`ensure_weasyprint`] while it installs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Started,
    Succeeded,
    Failed,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns the first usable launcher, or `None` when the engine is missing.
///
/// Runs `--version` on each candidate; never installs anything.
pub fn probe(opts: &LocateOptions) -> Option<Launcher> {
    if let Some(program) = opts.program_override() {
        return try_launcher(Launcher::direct(program));
    }

    if let Some(python) = opts.python_override() {
        return try_launcher(Launcher::python_module(python));
    }

    if let Some(l) = try_launcher(Launcher::direct(PathBuf::from(MODULE))) {
        return Some(l);
    }

    PYTHON_CANDIDATES
        .iter()
        .find_map(|py| try_launcher(Launcher::python_module(PathBuf::from(py))))
}

/// Boolean form of [`probe`].
pub fn is_weasyprint_available(opts: &LocateOptions) -> bool {
    probe(opts).is_some()
}

/// Installs WeasyPrint with `<python> -m pip install weasyprint`.
///
/// Blocks until pip exits. Output is captured; on failure the last lines of
/// pip's stderr are returned inside [`WeasyPrintAutoError::InstallFailed`].
pub fn install_weasyprint(opts: &LocateOptions) -> Result<(), WeasyPrintAutoError> {
    let python = find_python(opts)?;

    let output = Command::new(&python)
        .args(["-m", "pip", "install", PACKAGE])
        .args(&opts.pip_args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| WeasyPrintAutoError::Spawn {
            program: python.display().to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(WeasyPrintAutoError::InstallFailed {
            package: PACKAGE.to_string(),
            status: describe_status(output.status),
            stderr: tail_lines(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
        });
    }

    Ok(())
}

/// Probes for the engine and installs it once if it is missing.
///
/// `on_install` receives [`InstallPhase`] events when an install is attempted.
/// Pass `None` to suppress them.
pub fn ensure_weasyprint(
    opts: &LocateOptions,
    on_install: Option<&dyn Fn(InstallPhase)>,
) -> Result<Acquisition, WeasyPrintAutoError> {
    if let Some(l) = probe(opts) {
        return Ok(Acquisition::Found(l));
    }

    let notify = |phase| {
        if let Some(cb) = on_install {
            cb(phase);
        }
    };

    notify(InstallPhase::Started);
    if let Err(e) = install_weasyprint(opts) {
        notify(InstallPhase::Failed);
        return Err(e);
    }

    match probe(opts) {
        Some(l) => {
            notify(InstallPhase::Succeeded);
            Ok(Acquisition::Installed(l))
        }
        None => {
            notify(InstallPhase::Failed);
            Err(WeasyPrintAutoError::StillUnavailable {
                package: PACKAGE.to_string(),
            })
        }
    }
}

/// Extracts the version number from `weasyprint --version` output.
pub fn parse_version(output: &str) -> Option<String> {
    static RE_VERSION: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)weasyprint\s+(?:version\s+)?v?([0-9][0-9A-Za-z.+\-]*)").unwrap()
    });

    RE_VERSION
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Human-readable exit status: `exit code 1`, or `terminated by signal`.
pub fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// The last `n` lines of `text`, trailing whitespace trimmed.
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn try_launcher(mut launcher: Launcher) -> Option<Launcher> {
    let output = launcher
        .command()
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    launcher.version = parse_version(&text);
    Some(launcher)
}

fn find_python(opts: &LocateOptions) -> Result<PathBuf, WeasyPrintAutoError> {
    let candidates = opts.python_candidates();
    candidates
        .iter()
        .find(|py| runs_ok(py, ["--version"]))
        .cloned()
        .ok_or_else(|| WeasyPrintAutoError::NoPython {
            tried: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn runs_ok<I, S>(program: &Path, args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(name: &str) -> PathBuf {
        PathBuf::from("/nonexistent/weasyprint-auto-test").join(name)
    }

    #[test]
    fn parse_version_modern_output() {
        assert_eq!(
            parse_version("WeasyPrint version 62.3\n").as_deref(),
            Some("62.3")
        );
    }

    #[test]
    fn parse_version_without_keyword() {
        assert_eq!(parse_version("weasyprint 52.5").as_deref(), Some("52.5"));
    }

    #[test]
    fn parse_version_garbage() {
        assert_eq!(parse_version("command not found"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn tail_lines_keeps_last_n() {
        let text = "a\nb\nc\nd\n";
        assert_eq!(tail_lines(text, 2), "c\nd");
        assert_eq!(tail_lines(text, 10), "a\nb\nc\nd");
        assert_eq!(tail_lines("", 3), "");
    }

    #[test]
    fn launcher_display_includes_module_args() {
        let mut l = Launcher::python_module(PathBuf::from("python3"));
        l.version = Some("62.3".into());
        assert_eq!(l.to_string(), "python3 -m weasyprint (version 62.3)");
    }

    #[test]
    fn explicit_program_is_probed_exclusively() {
        let opts = LocateOptions {
            program: Some(missing("weasyprint")),
            ..Default::default()
        };
        assert!(probe(&opts).is_none());
        assert!(!is_weasyprint_available(&opts));
    }

    #[test]
    fn install_without_python_reports_no_python() {
        let opts = LocateOptions {
            python: Some(missing("python3")),
            ..Default::default()
        };
        let err = install_weasyprint(&opts).unwrap_err();
        assert!(matches!(err, WeasyPrintAutoError::NoPython { .. }), "got: {err}");
        assert!(err.to_string().contains("python3"));
    }

    #[test]
    fn ensure_reports_failed_phase_when_uninstallable() {
        use std::cell::RefCell;

        let opts = LocateOptions {
            program: Some(missing("weasyprint")),
            python: Some(missing("python3")),
            pip_args: Vec::new(),
        };
        let phases = RefCell::new(Vec::new());
        let record = |p: InstallPhase| phases.borrow_mut().push(p);

        let result = ensure_weasyprint(&opts, Some(&record));
        assert!(result.is_err());
        assert_eq!(
            *phases.borrow(),
            vec![InstallPhase::Started, InstallPhase::Failed]
        );
    }

    #[cfg(unix)]
    #[test]
    fn probe_accepts_working_executable() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("weasyprint");
        let mut f = std::fs::File::create(&script).unwrap();
        writeln!(f, "#!/bin/sh\necho 'WeasyPrint version 61.2'").unwrap();
        drop(f);
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let opts = LocateOptions {
            program: Some(script.clone()),
            ..Default::default()
        };
        let launcher = probe(&opts).expect("fake engine should be usable");
        assert_eq!(launcher.program, script);
        assert!(launcher.args.is_empty());
        assert_eq!(launcher.version.as_deref(), Some("61.2"));

        let acquired = ensure_weasyprint(&opts, None).unwrap();
        assert!(!acquired.was_installed());
    }

    #[cfg(unix)]
    #[test]
    fn probe_rejects_failing_executable() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("weasyprint");
        let mut f = std::fs::File::create(&script).unwrap();
        writeln!(f, "#!/bin/sh\nexit 1").unwrap();
        drop(f);
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let opts = LocateOptions {
            program: Some(script),
            ..Default::default()
        };
        assert!(probe(&opts).is_none());
    }

    /// Fake interpreter whose `-m pip install` succeeds and makes
    /// `-m weasyprint` usable afterwards.
    #[cfg(unix)]
    const PYTHON_WITH_WORKING_PIP: &str = r#"#!/bin/sh
here=$(dirname "$0")
if [ "$1" = "--version" ]; then echo "Python 3.12.1"; exit 0; fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  echo "$@" >> "$here/pip_calls.txt"
  touch "$here/installed"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "weasyprint" ] && [ -f "$here/installed" ]; then
  echo "WeasyPrint version 62.3"
  exit 0
fi
exit 1
"#;

    /// Fake interpreter whose pip reports success but installs nothing.
    #[cfg(unix)]
    const PYTHON_WITH_NOOP_PIP: &str = r#"#!/bin/sh
here=$(dirname "$0")
if [ "$1" = "--version" ]; then echo "Python 3.12.1"; exit 0; fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  echo "$@" >> "$here/pip_calls.txt"
  exit 0
fi
exit 1
"#;

    #[cfg(unix)]
    fn fake_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn ensure_with_phases(
        opts: &LocateOptions,
    ) -> (Result<Acquisition, WeasyPrintAutoError>, Vec<InstallPhase>) {
        use std::cell::RefCell;

        let phases = RefCell::new(Vec::new());
        let record = |p: InstallPhase| phases.borrow_mut().push(p);
        let result = ensure_weasyprint(opts, Some(&record));
        (result, phases.into_inner())
    }

    #[cfg(unix)]
    #[test]
    fn ensure_installs_once_then_finds_engine() {
        let dir = tempfile::tempdir().unwrap();
        let python = fake_executable(dir.path(), "python3", PYTHON_WITH_WORKING_PIP);
        let opts = LocateOptions {
            python: Some(python.clone()),
            pip_args: vec!["--user".to_string()],
            ..Default::default()
        };
        assert!(probe(&opts).is_none());

        let (result, phases) = ensure_with_phases(&opts);
        let acquired = result.unwrap();

        assert!(acquired.was_installed());
        assert_eq!(phases, vec![InstallPhase::Started, InstallPhase::Succeeded]);
        let launcher = acquired.launcher();
        assert_eq!(launcher.program, python);
        assert_eq!(launcher.args, vec!["-m", "weasyprint"]);
        assert_eq!(launcher.version.as_deref(), Some("62.3"));

        let calls = std::fs::read_to_string(dir.path().join("pip_calls.txt")).unwrap();
        assert_eq!(calls.trim_end(), "-m pip install weasyprint --user");

        // Already installed: no second pip run.
        let (again, phases) = ensure_with_phases(&opts);
        assert!(!again.unwrap().was_installed());
        assert!(phases.is_empty());
        let calls = std::fs::read_to_string(dir.path().join("pip_calls.txt")).unwrap();
        assert_eq!(calls.lines().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn ensure_reports_engine_still_missing_after_pip_success() {
        let dir = tempfile::tempdir().unwrap();
        let python = fake_executable(dir.path(), "python3", PYTHON_WITH_NOOP_PIP);
        let opts = LocateOptions {
            python: Some(python),
            ..Default::default()
        };

        let (result, phases) = ensure_with_phases(&opts);
        let err = result.unwrap_err();

        assert!(
            matches!(err, WeasyPrintAutoError::StillUnavailable { ref package } if package == "weasyprint"),
            "got: {err}"
        );
        assert_eq!(phases, vec![InstallPhase::Started, InstallPhase::Failed]);
        let calls = std::fs::read_to_string(dir.path().join("pip_calls.txt")).unwrap();
        assert_eq!(calls.lines().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn explicit_python_is_the_only_module_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let python = fake_executable(dir.path(), "python3", PYTHON_WITH_WORKING_PIP);
        std::fs::write(dir.path().join("installed"), "").unwrap();

        let opts = LocateOptions {
            python: Some(python.clone()),
            ..Default::default()
        };
        let launcher = probe(&opts).expect("fake interpreter provides the engine");
        assert_eq!(launcher.program, python);
        assert_eq!(
            launcher.to_string(),
            format!("{} -m weasyprint (version 62.3)", python.display())
        );

        let opts = LocateOptions {
            python: Some(missing("python3")),
            ..Default::default()
        };
        assert!(probe(&opts).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn describe_status_formats_exit_code() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(describe_status(ExitStatus::from_raw(3 << 8)), "exit code 3");
        assert_eq!(describe_status(ExitStatus::from_raw(9)), "terminated by signal");
    }
}

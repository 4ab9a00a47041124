//! Forked `javac` processes as a compiler tool.

use crate::dump::write_argfile;
use crate::error::InvokeError;
use crate::tool::{CompilerTool, Invocation};
use javelin_common::Release;
use javelin_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use javelin_options::{OptionChecker, StandardChecker};
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static ARGFILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A `javac` executable driven through argfiles.
///
/// Tool options and files go into a temporary argfile; `-J` runtime
/// options are rejected inside argfiles and stay on the command line.
/// Diagnostics come back by parsing the stderr stream, which is the only
/// diagnostic channel a forked compiler has.
pub struct ForkedJavac {
    executable: PathBuf,
    release: Release,
}

impl ForkedJavac {
    /// Creates a forked tool for a known executable and release.
    pub fn new(executable: impl Into<PathBuf>, release: Release) -> Self {
        Self {
            executable: executable.into(),
            release,
        }
    }

    /// Probes `<executable> --version` to learn the tool's release.
    pub fn detect(executable: impl Into<PathBuf>) -> Result<Self, InvokeError> {
        let executable: PathBuf = executable.into();
        let output = Command::new(&executable)
            .arg("--version")
            .output()
            .map_err(|source| InvokeError::Spawn {
                tool: executable.display().to_string(),
                source,
            })?;
        let text = String::from_utf8_lossy(&output.stdout);
        let release = parse_version(&text).ok_or_else(|| InvokeError::ToolVersion {
            tool: executable.display().to_string(),
            output: text.trim().to_string(),
        })?;
        debug!(release = %release, "detected compiler release");
        Ok(Self::new(executable, release))
    }

    fn argfile_path(&self) -> PathBuf {
        let n = ARGFILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("javelin-javac-{}-{n}.args", std::process::id()))
    }
}

impl OptionChecker for ForkedJavac {
    fn accepted_arity(&self, option: &str) -> Option<u8> {
        StandardChecker.accepted_arity(option)
    }
}

impl CompilerTool for ForkedJavac {
    fn name(&self) -> &str {
        "javac"
    }

    fn release(&self) -> Release {
        self.release
    }

    fn run(&self, invocation: &Invocation, sink: &DiagnosticSink) -> Result<bool, InvokeError> {
        let (runtime, tool_options): (Vec<String>, Vec<String>) = invocation
            .options
            .iter()
            .cloned()
            .partition(|o| o.starts_with("-J"));
        let filtered = Invocation {
            options: tool_options,
            files: invocation.files.clone(),
            output: invocation.output.clone(),
        };
        let argfile = self.argfile_path();
        write_argfile(&argfile, &filtered)?;

        let result = Command::new(&self.executable)
            .args(&runtime)
            .arg(format!("@{}", argfile.display()))
            .output();
        let _ = std::fs::remove_file(&argfile);
        let output = result.map_err(|source| InvokeError::Spawn {
            tool: self.executable.display().to_string(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for diag in parse_diagnostics(&stderr) {
            sink.emit(diag);
        }
        debug!(status = ?output.status.code(), "javac finished");
        Ok(output.status.success())
    }
}

/// Extracts the feature release from `javac --version` output
/// (`"javac 21.0.2"` is release 21, `"javac 1.8.0_292"` is release 8).
fn parse_version(text: &str) -> Option<Release> {
    let token = text
        .split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))?;
    let mut segments = token.split(['.', '_', '-']);
    let first = segments.next()?;
    let feature = if first == "1" { segments.next()? } else { first };
    Release::from_str(feature).ok()
}

/// Parses the `javac` stderr stream into structured diagnostics.
///
/// Located diagnostics look like `src/Main.java:3: error: ';' expected`,
/// followed by a source echo and a caret line that are folded into the
/// message. Unlocated lines (`error: invalid flag`, `Note: ...`) map to
/// diagnostics without a path. The trailing `N errors` / `N warnings`
/// summary lines are dropped; the sink counts for itself.
fn parse_diagnostics(stderr: &str) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = Vec::new();
    for line in stderr.lines() {
        if is_summary_line(line) {
            continue;
        }
        if let Some(diag) = parse_line(line) {
            diags.push(diag);
        } else if let Some(last) = diags.last_mut() {
            last.message.push('\n');
            last.message.push_str(line);
        }
    }
    diags
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    const MARKERS: [(&str, Severity); 3] = [
        (": error: ", Severity::Error),
        (": warning: ", Severity::Warning),
        (": note: ", Severity::Note),
    ];
    for (marker, severity) in MARKERS {
        if let Some(pos) = line.find(marker) {
            let mut diag = Diagnostic::new(severity, &line[pos + marker.len()..]);
            if let Some((path, line_no)) = split_location(&line[..pos]) {
                diag.path = Some(path.into());
                diag.line = Some(line_no);
            } else {
                diag.message = line.to_string();
            }
            return Some(diag);
        }
    }
    for (prefix, severity) in [
        ("error: ", Severity::Error),
        ("warning: ", Severity::Warning),
        ("Note: ", Severity::Note),
    ] {
        if let Some(message) = line.strip_prefix(prefix) {
            return Some(Diagnostic::new(severity, message));
        }
    }
    None
}

/// Splits `path:line` into its parts; `None` when the tail is not a line
/// number (a message that merely contains a colon).
fn split_location(location: &str) -> Option<(&str, u32)> {
    let (path, line) = location.rsplit_once(':')?;
    Some((path, line.parse().ok()?))
}

fn is_summary_line(line: &str) -> bool {
    let mut parts = line.trim().splitn(2, ' ');
    let (Some(count), Some(label)) = (parts.next(), parts.next()) else {
        return false;
    };
    !count.is_empty()
        && count.bytes().all(|b| b.is_ascii_digit())
        && matches!(label, "error" | "errors" | "warning" | "warnings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    // -- version parsing tests --

    #[test]
    fn parses_modern_version() {
        assert_eq!(parse_version("javac 21.0.2"), Some(Release::new(21)));
        assert_eq!(parse_version("javac 17\n"), Some(Release::new(17)));
    }

    #[test]
    fn parses_legacy_version() {
        assert_eq!(parse_version("javac 1.8.0_292"), Some(Release::new(8)));
    }

    #[test]
    fn rejects_unparsable_version() {
        assert_eq!(parse_version("not a compiler"), None);
        assert_eq!(parse_version(""), None);
    }

    // -- diagnostic parsing tests --

    #[test]
    fn parses_located_diagnostics() {
        let stderr = "\
src/Main.java:3: error: ';' expected
        int x = 1
                 ^
src/Util.java:7: warning: [deprecation] foo() in Bar has been deprecated
        u.foo();
         ^
2 errors
1 warning
";
        let diags = parse_diagnostics(stderr);
        assert_eq!(diags.len(), 2);

        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].path.as_deref(), Some(Path::new("src/Main.java")));
        assert_eq!(diags[0].line, Some(3));
        assert!(diags[0].message.starts_with("';' expected"));
        assert!(diags[0].message.contains('^'), "caret line folded in");

        assert_eq!(diags[1].severity, Severity::Warning);
        assert_eq!(diags[1].line, Some(7));
    }

    #[test]
    fn parses_unlocated_diagnostics() {
        let stderr = "\
error: invalid flag: --bogus
Usage: javac <options> <source files>
Note: Some input files use deprecated API.
";
        let diags = parse_diagnostics(stderr);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].severity, Severity::Error);
        assert!(diags[0].path.is_none());
        assert!(diags[0].message.contains("Usage: javac"));
        assert_eq!(diags[1].severity, Severity::Note);
    }

    #[test]
    fn summary_lines_are_dropped() {
        assert!(is_summary_line("1 error"));
        assert!(is_summary_line("12 warnings"));
        assert!(!is_summary_line("error: bad"));
        assert!(!is_summary_line("12 problems"));
    }

    #[test]
    fn colon_in_message_does_not_fake_a_location() {
        let diags = parse_diagnostics("weird prefix: error: message text\n");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].path.is_none());
        assert_eq!(diags[0].message, "weird prefix: error: message text");
    }

    #[test]
    fn checker_delegates_to_standard_table() {
        let tool = ForkedJavac::new("javac", Release::new(21));
        assert_eq!(tool.accepted_arity("-nowarn"), Some(0));
        assert_eq!(tool.accepted_arity("--release"), Some(1));
        assert_eq!(tool.accepted_arity("--definitely-not-real"), None);
    }
}

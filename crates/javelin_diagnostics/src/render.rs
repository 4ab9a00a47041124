//! Diagnostic rendering backends for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
///
/// Implementations format diagnostics for different output targets. The
/// compiler tool already formats its own message body, so renderers only
/// add the location prefix and severity tag.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in the javac terminal format.
///
/// Produces output like:
/// ```text
/// src/Main.java:12: error: ';' expected
/// ```
/// with the severity tag colored when ANSI color is enabled. Diagnostics
/// without a location render as `severity: message`.
pub struct PlainRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl PlainRenderer {
    /// Creates a new plain renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_tag(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
            Severity::Other => "37",
        };
        format!("\x1b[1;{code}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for PlainRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let tag = self.severity_tag(diag.severity);
        match (&diag.path, diag.line) {
            (Some(path), Some(line)) => {
                format!("{}:{}: {}: {}", path.display(), line, tag, diag.message)
            }
            (Some(path), None) => format!("{}: {}: {}", path.display(), tag, diag.message),
            _ => format!("{}: {}", tag, diag.message),
        }
    }
}

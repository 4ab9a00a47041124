//! Structured diagnostic messages with severity and source locations.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A structured diagnostic message reported by the compiler tool.
///
/// Diagnostics are the primary mechanism for surfacing compiler errors,
/// warnings, and notes to the user. Each diagnostic carries:
/// - A severity level and the main message text
/// - An optional source location (path, line, and column)
///
/// Location fields are optional because the tool reports some problems
/// against no file at all (for example annotation processor failures).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The main diagnostic message.
    pub message: String,
    /// The source file the diagnostic points at, if any.
    pub path: Option<PathBuf>,
    /// The 1-based line within `path`, if known.
    pub line: Option<u32>,
    /// The 1-based column within `line`, if known.
    pub column: Option<u32>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given message and no location.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a new warning diagnostic with the given message and no location.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates a new note diagnostic with the given message and no location.
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Creates a new diagnostic with the given severity and no location.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            path: None,
            line: None,
            column: None,
        }
    }

    /// Attaches a source location to this diagnostic.
    pub fn with_location(mut self, path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        self.path = Some(path.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attaches a source file without a line or column.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// A one-line summary of this diagnostic suitable for a build failure
    /// message: the location prefix (when present) followed by the first
    /// line of the message.
    pub fn summary(&self) -> String {
        let first_line = self.message.lines().next().unwrap_or("");
        match (&self.path, self.line) {
            (Some(path), Some(line)) => format!("{}:{}: {}", path.display(), line, first_line),
            (Some(path), None) => format!("{}: {}", path.display(), first_line),
            _ => first_line.to_string(),
        }
    }
}

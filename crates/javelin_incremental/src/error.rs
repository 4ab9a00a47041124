//! Error types for incremental change detection.

use std::path::PathBuf;

/// Errors that can occur during change detection or status persistence.
///
/// All of these are fatal: without a reliable status file and reliable
/// timestamps there is no safe incremental answer.
#[derive(Debug, thiserror::Error)]
pub enum IncrementalError {
    /// The status file could not be read or written.
    #[error("failed to access build status at {path}: {source}")]
    StatusIo {
        /// The status file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The status record could not be encoded.
    #[error("failed to encode build status: {reason}")]
    StatusEncode {
        /// Description of the encoding failure.
        reason: String,
    },

    /// A file involved in change detection could not be inspected or
    /// removed.
    #[error("failed to inspect {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Module-driven incremental compilation requires every source
    /// directory to declare a module name.
    #[error(
        "source directory '{root}' declares no module name, required for \
         module-driven incremental compilation"
    )]
    MissingModuleName {
        /// The offending directory root.
        root: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_module_name() {
        let err = IncrementalError::MissingModuleName {
            root: PathBuf::from("src/main/java"),
        };
        let text = format!("{err}");
        assert!(text.contains("src/main/java"));
        assert!(text.contains("module-driven"));
    }

    #[test]
    fn display_status_io() {
        let err = IncrementalError::StatusIo {
            path: PathBuf::from("target/javelin-status/status.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(format!("{err}").starts_with("failed to access build status"));
    }
}

//! Error types for source scanning.

use std::path::PathBuf;

/// Errors that can occur while building filters or scanning source trees.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A glob pattern in an include/exclude list could not be compiled.
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern string.
        pattern: String,
        /// The underlying glob compilation failure.
        #[source]
        source: glob::PatternError,
    },

    /// Include/exclude filters were configured together with module-driven
    /// incremental compilation; the compiler scans sources itself in that
    /// mode, so filters cannot be honored.
    #[error(
        "include/exclude filters cannot be combined with module-driven \
         incremental compilation (incremental.aspects = \"modules\")"
    )]
    FiltersWithModuleDriven,

    /// An I/O error occurred while walking a source directory.
    #[error("failed to scan source directory {path}: {source}")]
    WalkError {
        /// The directory being walked.
        path: PathBuf,
        /// The underlying walk failure.
        #[source]
        source: walkdir::Error,
    },

    /// File metadata could not be read during the scan.
    #[error("failed to read metadata for {path}: {source}")]
    MetadataError {
        /// The file whose metadata was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_pattern() {
        let source = glob::Pattern::new("a[").unwrap_err();
        let err = ScanError::InvalidPattern {
            pattern: "a[".to_string(),
            source,
        };
        assert!(format!("{err}").starts_with("invalid filter pattern 'a['"));
    }

    #[test]
    fn display_filters_with_module_driven() {
        let err = ScanError::FiltersWithModuleDriven;
        assert!(format!("{err}").contains("module-driven"));
    }
}

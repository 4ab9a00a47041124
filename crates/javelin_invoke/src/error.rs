//! Error types for tool invocation.

use std::path::PathBuf;

/// Errors that can occur while orchestrating compiler invocations.
///
/// Failing *sources* are not an error here; the executor reports them
/// through the diagnostic sink and a `false` success flag. These variants
/// cover the orchestration itself breaking.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The tool process could not be spawned or awaited.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// The tool executable involved.
        tool: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The tool's version output could not be understood.
    #[error("cannot determine the release of {tool} from '{output}'")]
    ToolVersion {
        /// The tool executable involved.
        tool: String,
        /// What the tool printed instead of a parsable version.
        output: String,
    },

    /// A file needed by the invocation could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A compiled module descriptor is not a class file.
    #[error("{path} is not a class file, refusing to patch its version")]
    DescriptorFormat {
        /// The file that should have been a class file.
        path: PathBuf,
    },

    /// Two fallback placements targeted the same patched module. The
    /// placement plan is built wrongly; this is a bug, not a user error.
    #[error("module '{module}' was patched twice in one invocation")]
    DuplicatePatchTarget {
        /// The module patched more than once.
        module: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_patch_target() {
        let err = InvokeError::DuplicatePatchTarget {
            module: "org.example.api".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "module 'org.example.api' was patched twice in one invocation"
        );
    }

    #[test]
    fn io_error_preserves_source() {
        use std::error::Error as _;
        let err = InvokeError::Io {
            path: PathBuf::from("out/module-info.class"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}

//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `javelin.toml`
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A version string could not be parsed as a Java release.
    #[error("invalid value for {parameter}: {source}")]
    InvalidRelease {
        /// The configuration parameter holding the bad value.
        parameter: String,
        /// The underlying parse failure.
        #[source]
        source: javelin_common::ParseReleaseError,
    },

    /// An incremental-aspect descriptor contains an unknown token.
    #[error("invalid incremental aspect '{token}' in {parameter}")]
    InvalidAspect {
        /// The configuration parameter holding the descriptor.
        parameter: String,
        /// The unrecognized token.
        token: String,
    },

    /// A configuration value or combination of values failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("project.name".to_string());
        assert_eq!(format!("{err}"), "missing required field: project.name");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_invalid_release() {
        let source = javelin_common::Release::from_str("banana").unwrap_err();
        let err = ConfigError::InvalidRelease {
            parameter: "compiler.release".to_string(),
            source,
        };
        assert_eq!(
            format!("{err}"),
            "invalid value for compiler.release: invalid release version: 'banana'"
        );
    }

    #[test]
    fn display_invalid_aspect() {
        let err = ConfigError::InvalidAspect {
            parameter: "incremental.aspects".to_string(),
            token: "bogus".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid incremental aspect 'bogus' in incremental.aspects"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        let display = format!("{err}");
        assert!(display.starts_with("failed to read configuration:"));
    }
}

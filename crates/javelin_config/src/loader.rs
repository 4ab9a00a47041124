//! Configuration file loading and validation.

use crate::aspects::parse_aspects;
use crate::error::ConfigError;
use crate::types::CompilerConfig;
use javelin_common::Release;
use std::path::Path;
use std::str::FromStr;

/// Loads and validates a `javelin.toml` configuration from a project
/// directory.
///
/// Reads `<project_dir>/javelin.toml`, parses it, and validates required
/// fields and option combinations before any build work starts.
pub fn load_config(project_dir: &Path) -> Result<CompilerConfig, ConfigError> {
    let config_path = project_dir.join("javelin.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `javelin.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CompilerConfig, ConfigError> {
    let config: CompilerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and rejects option combinations the compiler
/// would refuse, naming the offending parameter.
fn validate_config(config: &CompilerConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    for (parameter, value) in [
        ("compiler.release", &config.compiler.release),
        ("compiler.source", &config.compiler.source),
        ("compiler.target", &config.compiler.target),
    ] {
        if let Some(value) = value {
            Release::from_str(value).map_err(|source| ConfigError::InvalidRelease {
                parameter: parameter.to_string(),
                source,
            })?;
        }
    }
    for (index, root) in config.paths.source_roots.iter().enumerate() {
        if let Some(value) = root.release() {
            Release::from_str(value).map_err(|source| ConfigError::InvalidRelease {
                parameter: format!("paths.source_roots[{index}].release"),
                source,
            })?;
        }
    }
    if config.compiler.release.is_some()
        && (config.compiler.source.is_some() || config.compiler.target.is_some())
    {
        return Err(ConfigError::ValidationError(
            "compiler.release cannot be combined with compiler.source or compiler.target"
                .to_string(),
        ));
    }
    if config.compiler.enable_preview
        && config.compiler.release.is_none()
        && config.compiler.source.is_none()
        && config.compiler.target.is_none()
    {
        return Err(ConfigError::ValidationError(
            "compiler.enable_preview requires compiler.release or compiler.source/target"
                .to_string(),
        ));
    }
    for level in &config.compiler.debug_levels {
        if !matches!(level.as_str(), "lines" | "vars" | "source" | "none") {
            return Err(ConfigError::ValidationError(format!(
                "unsupported debug level '{level}' in compiler.debug_levels"
            )));
        }
    }
    parse_aspects(&config.incremental.aspects, "incremental.aspects")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "app"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "app");
        assert_eq!(config.project.version, "");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "app"
version = "2.1.0"

[compiler]
release = 17
encoding = "UTF-8"
debug = true
debug_levels = ["lines", "source"]
parameters = true
proc = "full"
processors = ["com.example.Gen"]
lint = ["unchecked", "deprecation"]
compiler_args = ["-Xdoclint:none"]
fork = true
max_memory = "1024m"

[incremental]
aspects = "defaults,rebuild-on-add"
stale_millis = 1000
dependency_extensions = ["class", "jar", "zip"]

[paths]
source_roots = ["src/main/java", "src/main/java17"]
output_directory = "out/classes"
includes = ["**/*.java"]
excludes = ["**/Legacy*.java"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.version, "2.1.0");
        assert_eq!(config.compiler.release.as_deref(), Some("17"));
        assert_eq!(config.compiler.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(config.compiler.debug_levels, vec!["lines", "source"]);
        assert!(config.compiler.parameters);
        assert!(config.compiler.fork);
        assert_eq!(config.incremental.stale_millis, 1000);
        assert_eq!(config.paths.source_roots.len(), 2);
        assert_eq!(config.paths.output_directory, "out/classes");
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn garbage_release_errors() {
        let toml = r#"
[project]
name = "app"

[compiler]
release = "banana"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::InvalidRelease { parameter, .. } => {
                assert_eq!(parameter, "compiler.release");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_root_release_names_parameter() {
        let toml = r#"
[project]
name = "app"

[paths]
source_roots = [{ path = "src/next", release = "next" }]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::InvalidRelease { parameter, .. } => {
                assert_eq!(parameter, "paths.source_roots[0].release");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_release_form_accepted() {
        let toml = r#"
[project]
name = "app"

[compiler]
source = "1.8"
target = "1.8"
"#;
        assert!(load_config_from_str(toml).is_ok());
    }

    #[test]
    fn release_conflicts_with_source_target() {
        let toml = r#"
[project]
name = "app"

[compiler]
release = 17
source = "17"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn enable_preview_requires_version() {
        let toml = r#"
[project]
name = "app"

[compiler]
enable_preview = true
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let toml = r#"
[project]
name = "app"

[compiler]
enable_preview = true
release = 21
"#;
        assert!(load_config_from_str(toml).is_ok());
    }

    #[test]
    fn bad_debug_level_errors() {
        let toml = r#"
[project]
name = "app"

[compiler]
debug_levels = ["lines", "everything"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_aspect_descriptor_errors() {
        let toml = r#"
[project]
name = "app"

[incremental]
aspects = "sources,bogus"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAspect { .. }));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}

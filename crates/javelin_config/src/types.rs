//! Configuration types deserialized from `javelin.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `javelin.toml`.
///
/// Contains project metadata, compiler option settings, incremental-build
/// settings, and the source/output path layout.
#[derive(Debug, Deserialize)]
pub struct CompilerConfig {
    /// Core project metadata (name, version).
    pub project: ProjectMeta,
    /// Compiler option settings (release, encoding, debug, lint, ...).
    #[serde(default)]
    pub compiler: CompilerSettings,
    /// Incremental-build settings (aspect descriptor, tolerances).
    #[serde(default)]
    pub incremental: IncrementalSettings,
    /// Source roots, output directory, and filter patterns.
    #[serde(default)]
    pub paths: PathSettings,
    /// Dependency path lists handed to the resolver boundary.
    #[serde(default)]
    pub dependencies: DependencySettings,
}

/// Core project metadata required in every `javelin.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string, passed as `--module-version` when the
    /// project declares a module.
    #[serde(default)]
    pub version: String,
}

/// Compiler option settings mapped onto the standard `javac` option list.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Target Java release (`--release`). Accepts `17` or `"17"`.
    #[serde(deserialize_with = "deserialize_opt_version")]
    pub release: Option<String>,
    /// Source language level (`-source`), for split source/target builds.
    #[serde(deserialize_with = "deserialize_opt_version")]
    pub source: Option<String>,
    /// Class file target level (`-target`).
    #[serde(deserialize_with = "deserialize_opt_version")]
    pub target: Option<String>,
    /// Source file encoding (`-encoding`).
    pub encoding: Option<String>,
    /// Whether to emit debug info (`-g`, or `-g:none` when false).
    pub debug: bool,
    /// Debug info subset, e.g. `["lines", "vars"]` for `-g:lines,vars`.
    pub debug_levels: Vec<String>,
    /// Whether compiler warnings are shown (`-nowarn` when false).
    pub show_warnings: bool,
    /// Whether warnings fail the compilation (`-Werror`).
    pub fail_on_warning: bool,
    /// Whether to keep method parameter names (`-parameters`).
    pub parameters: bool,
    /// Whether to enable preview language features (`--enable-preview`).
    pub enable_preview: bool,
    /// Whether the compiler runs in verbose mode (`-verbose`).
    pub verbose: bool,
    /// Whether to show deprecation details (`-deprecation`).
    pub show_deprecation: bool,
    /// Annotation processing mode (`-proc:none|only|full`); `None` passes
    /// no `-proc` option and leaves the compiler default in effect.
    pub proc: Option<ProcMode>,
    /// Explicit annotation processor class names (`-processor`).
    pub processors: Vec<String>,
    /// Lint categories for `-Xlint:...`; the value `all` collapses to the
    /// bare `-Xlint` flag.
    pub lint: Vec<String>,
    /// Extra arguments appended verbatim, after all checked options.
    pub compiler_args: Vec<String>,
    /// Whether to fork an external `javac` process instead of calling the
    /// in-process tool.
    pub fork: bool,
    /// Path to the `javac` executable used when forking.
    pub executable: Option<String>,
    /// Initial heap for a forked compiler (`-J-Xms`), e.g. `"256m"`.
    pub initial_memory: Option<String>,
    /// Maximum heap for a forked compiler (`-J-Xmx`).
    pub max_memory: Option<String>,
    /// Skips the whole compilation when set.
    pub skip: bool,
    /// Whether a failed compilation fails the build (exit code).
    pub fail_on_error: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            release: None,
            source: None,
            target: None,
            encoding: None,
            debug: true,
            debug_levels: Vec::new(),
            show_warnings: true,
            fail_on_warning: false,
            parameters: false,
            enable_preview: false,
            verbose: false,
            show_deprecation: false,
            proc: None,
            processors: Vec::new(),
            lint: Vec::new(),
            compiler_args: Vec::new(),
            fork: false,
            executable: None,
            initial_memory: None,
            max_memory: None,
            skip: false,
            fail_on_error: true,
        }
    }
}

/// Annotation processing mode.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcMode {
    /// Compile without running annotation processors.
    None,
    /// Run annotation processors without compiling.
    Only,
    /// Run annotation processors and compile (the compiler default).
    Full,
}

impl ProcMode {
    /// The `-proc:` option value for this mode.
    pub fn option_value(self) -> &'static str {
        match self {
            ProcMode::None => "none",
            ProcMode::Only => "only",
            ProcMode::Full => "full",
        }
    }
}

/// Incremental-build settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IncrementalSettings {
    /// Aspect descriptor string, parsed by
    /// [`parse_aspects`](crate::parse_aspects).
    pub aspects: String,
    /// Filesystem timestamp granularity tolerance in milliseconds,
    /// subtracted from source mtimes during staleness comparison.
    pub stale_millis: u64,
    /// File extensions considered during the dependency-change walk.
    pub dependency_extensions: Vec<String>,
}

impl Default for IncrementalSettings {
    fn default() -> Self {
        Self {
            aspects: "defaults".to_string(),
            stale_millis: 0,
            dependency_extensions: vec!["class".to_string(), "jar".to_string()],
        }
    }
}

/// One source root, either a plain path or a table declaring a target
/// release and module scope for the multi-release layout.
///
/// ```toml
/// source_roots = [
///     "src/main/java",
///     { path = "src/main/java17", release = 17 },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceRoot {
    /// A bare path compiling as part of the base unit.
    Path(String),
    /// A path with explicit release and/or module declarations.
    Detailed {
        /// The root directory, relative to the project directory.
        path: String,
        /// Target release for this root's sources.
        #[serde(default, deserialize_with = "deserialize_opt_version")]
        release: Option<String>,
        /// Module the root belongs to.
        #[serde(default)]
        module: Option<String>,
    },
}

impl SourceRoot {
    /// The root directory path.
    pub fn path(&self) -> &str {
        match self {
            SourceRoot::Path(path) => path,
            SourceRoot::Detailed { path, .. } => path,
        }
    }

    /// The declared target release, if any.
    pub fn release(&self) -> Option<&str> {
        match self {
            SourceRoot::Path(_) => None,
            SourceRoot::Detailed { release, .. } => release.as_deref(),
        }
    }

    /// The declared module name, if any.
    pub fn module(&self) -> Option<&str> {
        match self {
            SourceRoot::Path(_) => None,
            SourceRoot::Detailed { module, .. } => module.as_deref(),
        }
    }
}

/// Source roots, output directory, and filter patterns.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Root directories scanned for sources.
    pub source_roots: Vec<SourceRoot>,
    /// Directory receiving compiled class files.
    pub output_directory: String,
    /// Directory receiving generated sources when annotation processing
    /// is active (`-s`); derived from the output directory when unset.
    pub generated_sources_directory: Option<String>,
    /// Glob patterns selecting sources; empty means `**/*.java`.
    pub includes: Vec<String>,
    /// Glob patterns excluding sources.
    pub excludes: Vec<String>,
    /// Glob patterns for sources compiled on full builds but ignored as
    /// rebuild triggers.
    pub incremental_excludes: Vec<String>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            source_roots: vec![SourceRoot::Path("src/main/java".to_string())],
            output_directory: "target/classes".to_string(),
            generated_sources_directory: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            incremental_excludes: Vec::new(),
        }
    }
}

/// Dependency path lists, classified the way the compiler consumes them.
///
/// This is the configuration-file stand-in for a real dependency
/// resolver; entries are passed through verbatim, in order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DependencySettings {
    /// Class path entries (`--class-path`).
    pub classpath: Vec<String>,
    /// Module path entries (`--module-path`).
    pub module_path: Vec<String>,
    /// Annotation processor path entries (`--processor-path`).
    pub processor_path: Vec<String>,
}

/// Deserializes a version field that can be either a string or an integer.
///
/// Allows TOML config to accept both `release = "17"` and `release = 17`.
fn deserialize_opt_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrInt;

    impl<'de> Visitor<'de> for StringOrInt {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a version string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }
    }

    deserializer.deserialize_any(StringOrInt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn release_accepts_integer_and_string() {
        for input in ["release = 17", "release = \"17\""] {
            let toml = format!(
                r#"
[project]
name = "app"

[compiler]
{input}
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.compiler.release.as_deref(), Some("17"));
        }
    }

    #[test]
    fn proc_mode_all_variants() {
        for (input, expected) in [
            ("none", ProcMode::None),
            ("only", ProcMode::Only),
            ("full", ProcMode::Full),
        ] {
            let toml = format!(
                r#"
[project]
name = "app"

[compiler]
proc = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.compiler.proc, Some(expected));
            assert_eq!(expected.option_value(), input);
        }
    }

    #[test]
    fn compiler_defaults() {
        let toml = r#"
[project]
name = "app"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.compiler.release.is_none());
        assert!(config.compiler.debug);
        assert!(config.compiler.show_warnings);
        assert!(config.compiler.fail_on_error);
        assert!(!config.compiler.fork);
        assert!(!config.compiler.skip);
        assert!(config.compiler.proc.is_none());
    }

    #[test]
    fn incremental_defaults() {
        let toml = r#"
[project]
name = "app"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.incremental.aspects, "defaults");
        assert_eq!(config.incremental.stale_millis, 0);
        assert_eq!(config.incremental.dependency_extensions, vec!["class", "jar"]);
    }

    #[test]
    fn path_defaults() {
        let toml = r#"
[project]
name = "app"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.source_roots.len(), 1);
        assert_eq!(config.paths.source_roots[0].path(), "src/main/java");
        assert!(config.paths.source_roots[0].release().is_none());
        assert_eq!(config.paths.output_directory, "target/classes");
        assert!(config.paths.generated_sources_directory.is_none());
        assert!(config.paths.includes.is_empty());
    }

    #[test]
    fn detailed_source_roots() {
        let toml = r#"
[project]
name = "app"

[paths]
source_roots = [
    "src/main/java",
    { path = "src/main/java17", release = 17 },
    { path = "src/main/api", module = "org.example.api", release = "11" },
]
"#;
        let config = load_config_from_str(toml).unwrap();
        let roots = &config.paths.source_roots;
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0].path(), "src/main/java");
        assert!(roots[0].release().is_none());
        assert!(roots[0].module().is_none());
        assert_eq!(roots[1].path(), "src/main/java17");
        assert_eq!(roots[1].release(), Some("17"));
        assert_eq!(roots[2].module(), Some("org.example.api"));
        assert_eq!(roots[2].release(), Some("11"));
    }

    #[test]
    fn dependency_settings() {
        let toml = r#"
[project]
name = "app"

[dependencies]
classpath = ["libs/core.jar", "libs/util.jar"]
module_path = ["mods"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.dependencies.classpath,
            vec!["libs/core.jar", "libs/util.jar"]
        );
        assert_eq!(config.dependencies.module_path, vec!["mods"]);
        assert!(config.dependencies.processor_path.is_empty());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml = r#"
[project]
name = "app"

[incremental]
stale_millis = 2000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.incremental.stale_millis, 2000);
        assert_eq!(config.incremental.aspects, "defaults");
        assert_eq!(config.incremental.dependency_extensions, vec!["class", "jar"]);
    }
}

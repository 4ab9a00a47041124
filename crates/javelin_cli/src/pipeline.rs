//! Shared pipeline helpers for CLI commands.
//!
//! Contains the glue between `javelin.toml` and the compilation core:
//! project root resolution, the TOML-backed [`ProjectLayout`] adapter,
//! source directory construction, dependency path assembly, and the
//! build directory layout shared by `build` and `clean`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use javelin_common::{DependencyPaths, PathKind, Release};
use javelin_config::{CompilerConfig, ConfigError, ProcMode};
use javelin_partition::base_release;
use javelin_source::{ProjectLayout, ScanError, ScanFilters, SourceDirectory};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `javelin.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("javelin.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find javelin.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir →
/// itself). Otherwise walks up from the current directory looking for
/// `javelin.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// The class output directory, absolute under the project directory.
pub fn output_directory(config: &CompilerConfig, project_dir: &Path) -> PathBuf {
    project_dir.join(&config.paths.output_directory)
}

/// The directory holding build byproducts: the parent of the class
/// output, or the output itself when it has no parent.
pub fn build_directory(config: &CompilerConfig, project_dir: &Path) -> PathBuf {
    let output = output_directory(config, project_dir);
    match output.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => output,
    }
}

/// The build status directory, kept outside the class output tree so a
/// clean of the classes alone does not lose the baseline.
pub fn status_directory(config: &CompilerConfig, project_dir: &Path) -> PathBuf {
    build_directory(config, project_dir).join("javelin-status")
}

/// The directory receiving sources generated by annotation processing.
pub fn generated_sources_directory(config: &CompilerConfig, project_dir: &Path) -> PathBuf {
    match &config.paths.generated_sources_directory {
        Some(dir) => project_dir.join(dir),
        None => build_directory(config, project_dir).join("generated-sources"),
    }
}

/// Whether annotation processing runs in this build.
///
/// Explicit `proc` settings win; without one, processing runs only when
/// processors are named explicitly.
pub fn proc_active(config: &CompilerConfig) -> bool {
    match config.compiler.proc {
        Some(ProcMode::Only | ProcMode::Full) => true,
        Some(ProcMode::None) => false,
        None => !config.compiler.processors.is_empty(),
    }
}

/// Builds the scanned source directories from the configuration.
///
/// Each configured root becomes one [`SourceDirectory`] with its declared
/// release and module. When annotation processing is active the
/// generated-sources directory joins the set, so sources emitted by a
/// previous round are compiled and tracked like hand-written ones. Once
/// the build-wide base release is known, versioned output suffixes are
/// applied.
pub fn source_directories(
    config: &CompilerConfig,
    project_dir: &Path,
) -> Result<Vec<SourceDirectory>, ConfigError> {
    let base_output = output_directory(config, project_dir);
    let mut dirs = Vec::new();
    for (index, root) in config.paths.source_roots.iter().enumerate() {
        let mut dir = SourceDirectory::new(project_dir.join(root.path()), &base_output);
        if let Some(module) = root.module() {
            dir = dir.with_module(module);
        }
        if let Some(release) = root.release() {
            let release =
                Release::from_str(release).map_err(|source| ConfigError::InvalidRelease {
                    parameter: format!("paths.source_roots[{index}].release"),
                    source,
                })?;
            dir = dir.with_release(release);
        }
        dirs.push(dir);
    }
    if proc_active(config) {
        dirs.push(SourceDirectory::new(
            generated_sources_directory(config, project_dir),
            &base_output,
        ));
    }
    if let Some(base) = base_release(&dirs) {
        for dir in &mut dirs {
            dir.apply_versioned_output(base);
        }
    }
    Ok(dirs)
}

/// Compiles the caller-level scan filters from the project layout.
pub fn scan_filters(layout: &dyn ProjectLayout) -> Result<ScanFilters, ScanError> {
    ScanFilters::new(
        &layout.includes(),
        &layout.excludes(),
        &layout.incremental_excludes(),
    )
}

/// Assembles the configured dependency path lists, classified by kind.
///
/// Relative entries resolve against the project directory.
pub fn dependency_paths(config: &CompilerConfig, project_dir: &Path) -> DependencyPaths {
    let mut paths = DependencyPaths::new();
    for (kind, entries) in [
        (PathKind::ClassPath, &config.dependencies.classpath),
        (PathKind::ModulePath, &config.dependencies.module_path),
        (PathKind::ProcessorPath, &config.dependencies.processor_path),
    ] {
        if entries.is_empty() {
            continue;
        }
        paths.insert(kind, entries.iter().map(|e| project_dir.join(e)).collect());
    }
    paths
}

/// The path kinds the build accepts from the resolver.
///
/// Without a module descriptor the build lives in the classpath world and
/// the module-oriented kinds cannot be placed.
pub fn accepted_kinds(modular: bool) -> Vec<PathKind> {
    if modular {
        vec![
            PathKind::ClassPath,
            PathKind::ModulePath,
            PathKind::SourcePath,
            PathKind::ModuleSourcePath,
            PathKind::ProcessorPath,
            PathKind::ProcessorModulePath,
        ]
    } else {
        vec![
            PathKind::ClassPath,
            PathKind::SourcePath,
            PathKind::ProcessorPath,
        ]
    }
}

/// The TOML-backed [`ProjectLayout`] implementation.
pub struct TomlLayout<'a> {
    config: &'a CompilerConfig,
    project_dir: &'a Path,
}

impl<'a> TomlLayout<'a> {
    /// Adapts a loaded configuration rooted at `project_dir`.
    pub fn new(config: &'a CompilerConfig, project_dir: &'a Path) -> Self {
        Self {
            config,
            project_dir,
        }
    }
}

impl ProjectLayout for TomlLayout<'_> {
    fn compile_source_roots(&self) -> Vec<PathBuf> {
        self.config
            .paths
            .source_roots
            .iter()
            .map(|root| self.project_dir.join(root.path()))
            .collect()
    }

    fn output_directory(&self) -> PathBuf {
        output_directory(self.config, self.project_dir)
    }

    fn includes(&self) -> Vec<String> {
        self.config.paths.includes.clone()
    }

    fn excludes(&self) -> Vec<String> {
        self.config.paths.excludes.clone()
    }

    fn incremental_excludes(&self) -> Vec<String> {
        self.config.paths.incremental_excludes.clone()
    }

    fn generated_sources_directory(&self) -> Option<PathBuf> {
        if proc_active(self.config) {
            Some(generated_sources_directory(self.config, self.project_dir))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_config::load_config_from_str;
    use tempfile::TempDir;

    fn config(toml: &str) -> CompilerConfig {
        load_config_from_str(toml).unwrap()
    }

    fn minimal() -> CompilerConfig {
        config("[project]\nname = \"app\"\n")
    }

    // -- root resolution tests --

    #[test]
    fn find_root_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("javelin.toml"), "[project]\nname = \"app\"\n").unwrap();
        let nested = temp.path().join("src/main/java");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let temp = TempDir::new().unwrap();
        assert!(find_project_root(temp.path()).is_err());
    }

    #[test]
    fn resolve_with_config_file_uses_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("javelin.toml");
        std::fs::write(&config_path, "[project]\nname = \"app\"\n").unwrap();

        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(config_path.to_string_lossy().into_owned()),
        };
        assert_eq!(resolve_project_root(&global).unwrap(), temp.path());
    }

    #[test]
    fn resolve_with_config_dir_uses_it() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(temp.path().to_string_lossy().into_owned()),
        };
        assert_eq!(resolve_project_root(&global).unwrap(), temp.path());
    }

    // -- layout tests --

    #[test]
    fn directories_join_project_dir() {
        let cfg = minimal();
        let project = Path::new("/work/app");
        assert_eq!(
            output_directory(&cfg, project),
            Path::new("/work/app/target/classes")
        );
        assert_eq!(
            build_directory(&cfg, project),
            Path::new("/work/app/target")
        );
        assert_eq!(
            status_directory(&cfg, project),
            Path::new("/work/app/target/javelin-status")
        );
        assert_eq!(
            generated_sources_directory(&cfg, project),
            Path::new("/work/app/target/generated-sources")
        );
    }

    #[test]
    fn toml_layout_exposes_config_paths() {
        let cfg = config(
            r#"
[project]
name = "app"

[paths]
source_roots = ["src/main/java", { path = "src/main/java17", release = 17 }]
includes = ["**/*.java"]
excludes = ["**/Broken*.java"]
"#,
        );
        let project = Path::new("/work/app");
        let layout = TomlLayout::new(&cfg, project);
        assert_eq!(
            layout.compile_source_roots(),
            vec![
                PathBuf::from("/work/app/src/main/java"),
                PathBuf::from("/work/app/src/main/java17"),
            ]
        );
        assert_eq!(layout.includes(), vec!["**/*.java"]);
        assert_eq!(layout.excludes(), vec!["**/Broken*.java"]);
        assert!(layout.generated_sources_directory().is_none());
    }

    #[test]
    fn layout_reports_generated_dir_only_when_proc_active() {
        let cfg = config(
            r#"
[project]
name = "app"

[compiler]
proc = "full"
"#,
        );
        let project = Path::new("/work/app");
        let layout = TomlLayout::new(&cfg, project);
        assert_eq!(
            layout.generated_sources_directory(),
            Some(PathBuf::from("/work/app/target/generated-sources"))
        );
    }

    // -- source directory construction tests --

    #[test]
    fn source_directories_carry_release_and_module() {
        let cfg = config(
            r#"
[project]
name = "app"

[paths]
source_roots = [
    { path = "src/main/java", release = 11 },
    { path = "src/main/java17", release = 17 },
    { path = "src/main/api", module = "org.example.api" },
]
"#,
        );
        let dirs = source_directories(&cfg, Path::new("/work/app")).unwrap();
        assert_eq!(dirs.len(), 3);
        assert_eq!(dirs[0].release.map(|r| r.feature()), Some(11));
        assert_eq!(dirs[1].release.map(|r| r.feature()), Some(17));
        assert_eq!(dirs[2].module.as_deref(), Some("org.example.api"));
        // Base release 11 writes plainly, 17 gets the versioned suffix.
        assert_eq!(dirs[0].output(), Path::new("/work/app/target/classes"));
        assert_eq!(
            dirs[1].output(),
            Path::new("/work/app/target/classes/META-INF/versions/17")
        );
    }

    #[test]
    fn generated_root_joins_when_proc_active() {
        let cfg = config(
            r#"
[project]
name = "app"

[compiler]
processors = ["com.example.Gen"]
"#,
        );
        let dirs = source_directories(&cfg, Path::new("/work/app")).unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(
            dirs[1].root,
            Path::new("/work/app/target/generated-sources")
        );
    }

    #[test]
    fn proc_none_disables_processing() {
        let cfg = config(
            r#"
[project]
name = "app"

[compiler]
proc = "none"
processors = ["com.example.Gen"]
"#,
        );
        assert!(!proc_active(&cfg));
        assert_eq!(source_directories(&cfg, Path::new("/p")).unwrap().len(), 1);
    }

    // -- dependency path tests --

    #[test]
    fn dependency_paths_classified_and_resolved() {
        let cfg = config(
            r#"
[project]
name = "app"

[dependencies]
classpath = ["libs/core.jar", "/opt/shared/util.jar"]
module_path = ["mods"]
"#,
        );
        let paths = dependency_paths(&cfg, Path::new("/work/app"));
        assert_eq!(
            paths.get(&PathKind::ClassPath),
            Some(
                &[
                    PathBuf::from("/work/app/libs/core.jar"),
                    PathBuf::from("/opt/shared/util.jar"),
                ][..]
            )
        );
        assert_eq!(
            paths.get(&PathKind::ModulePath),
            Some(&[PathBuf::from("/work/app/mods")][..])
        );
        assert!(paths.get(&PathKind::ProcessorPath).is_none());
    }

    #[test]
    fn accepted_kinds_narrower_without_modules() {
        let plain = accepted_kinds(false);
        assert!(plain.contains(&PathKind::ClassPath));
        assert!(!plain.contains(&PathKind::ModulePath));

        let modular = accepted_kinds(true);
        assert!(modular.contains(&PathKind::ModulePath));
        assert!(modular.contains(&PathKind::ModuleSourcePath));
    }
}

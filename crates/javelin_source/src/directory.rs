//! Source directory model with derived output locations.

use javelin_common::Release;
use std::path::{Path, PathBuf};

/// The kind of files a source directory holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Java sources fed to the compiler.
    JavaSources,
    /// Other files carried along but never compiled.
    Other,
}

/// A root directory containing sources for one build.
///
/// Constructed once per build from the project layout or explicit
/// configuration. The output directory is a pure function of the build's
/// base output directory, the module name, and the target release: base
/// output, then a `<module>` subdirectory for module-scoped directories,
/// then a `META-INF/versions/<n>` subdirectory for releases above the
/// build-wide base. The versioned suffix is appended exactly once, by
/// [`apply_versioned_output`](Self::apply_versioned_output), after the base
/// release is known; no other mutation happens after construction apart
/// from the scanner recording the module descriptor it finds.
#[derive(Clone, Debug)]
pub struct SourceDirectory {
    /// The root path scanned for sources.
    pub root: PathBuf,
    /// What the directory holds.
    pub kind: DirectoryKind,
    /// Additional include patterns applying only to this directory.
    pub includes: Vec<String>,
    /// Additional exclude patterns applying only to this directory.
    pub excludes: Vec<String>,
    /// The module this directory belongs to, if declared.
    pub module: Option<String>,
    /// The target release for this directory, if declared.
    pub release: Option<Release>,
    /// The derived output directory for class files from this directory.
    output: PathBuf,
    /// Path of the module descriptor found during the scan, if any.
    descriptor: Option<PathBuf>,
    versioned_applied: bool,
}

impl SourceDirectory {
    /// Creates a source directory rooted at `root` writing into
    /// `base_output`.
    pub fn new(root: impl Into<PathBuf>, base_output: &Path) -> Self {
        Self {
            root: root.into(),
            kind: DirectoryKind::JavaSources,
            includes: Vec::new(),
            excludes: Vec::new(),
            module: None,
            release: None,
            output: base_output.to_path_buf(),
            descriptor: None,
            versioned_applied: false,
        }
    }

    /// Assigns a module name; the output gains a `<module>` subdirectory.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        let module = module.into();
        self.output.push(&module);
        self.module = Some(module);
        self
    }

    /// Assigns a target release for this directory.
    pub fn with_release(mut self, release: Release) -> Self {
        self.release = Some(release);
        self
    }

    /// Sets the per-directory include/exclude patterns.
    pub fn with_filters(mut self, includes: Vec<String>, excludes: Vec<String>) -> Self {
        self.includes = includes;
        self.excludes = excludes;
        self
    }

    /// Sets the directory kind.
    pub fn with_kind(mut self, kind: DirectoryKind) -> Self {
        self.kind = kind;
        self
    }

    /// The derived output directory for this source directory.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Appends the `META-INF/versions/<n>` suffix to the output directory
    /// once the build-wide base release is known.
    ///
    /// A directory targeting the base release (or no release) keeps the
    /// unversioned output. Subsequent calls have no effect; the suffix is
    /// applied at most once.
    pub fn apply_versioned_output(&mut self, base: Release) {
        if self.versioned_applied {
            return;
        }
        self.versioned_applied = true;
        if let Some(release) = self.release {
            if release > base {
                self.output.push("META-INF");
                self.output.push("versions");
                self.output.push(release.feature().to_string());
            }
        }
    }

    /// Records the module descriptor found at `path` during the scan.
    ///
    /// When several descriptors appear under one root the one nearest the
    /// root wins, guarding against accidental duplicates in nested trees.
    pub fn record_descriptor(&mut self, path: PathBuf) {
        let depth = path.components().count();
        match &self.descriptor {
            Some(existing) if existing.components().count() <= depth => {}
            _ => self.descriptor = Some(path),
        }
    }

    /// The module descriptor recorded for this directory, if any.
    pub fn descriptor(&self) -> Option<&Path> {
        self.descriptor.as_deref()
    }

    /// Whether any per-directory include/exclude patterns are set.
    pub fn has_filters(&self) -> bool {
        !self.includes.is_empty() || !self.excludes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn release(s: &str) -> Release {
        Release::from_str(s).unwrap()
    }

    #[test]
    fn plain_directory_outputs_to_base() {
        let dir = SourceDirectory::new("src/main/java", Path::new("target/classes"));
        assert_eq!(dir.output(), Path::new("target/classes"));
        assert!(dir.module.is_none());
        assert_eq!(dir.kind, DirectoryKind::JavaSources);
    }

    #[test]
    fn module_gets_subdirectory() {
        let dir = SourceDirectory::new("src/com.acme.app", Path::new("target/classes"))
            .with_module("com.acme.app");
        assert_eq!(dir.output(), Path::new("target/classes/com.acme.app"));
    }

    #[test]
    fn versioned_suffix_above_base() {
        let mut dir = SourceDirectory::new("src/main/java17", Path::new("target/classes"))
            .with_release(release("17"));
        dir.apply_versioned_output(release("11"));
        assert_eq!(dir.output(), Path::new("target/classes/META-INF/versions/17"));
    }

    #[test]
    fn base_release_keeps_unversioned_output() {
        let mut dir = SourceDirectory::new("src/main/java", Path::new("target/classes"))
            .with_release(release("11"));
        dir.apply_versioned_output(release("11"));
        assert_eq!(dir.output(), Path::new("target/classes"));
    }

    #[test]
    fn versioned_suffix_applied_once() {
        let mut dir = SourceDirectory::new("src/main/java17", Path::new("target/classes"))
            .with_release(release("17"));
        dir.apply_versioned_output(release("11"));
        dir.apply_versioned_output(release("11"));
        assert_eq!(dir.output(), Path::new("target/classes/META-INF/versions/17"));
    }

    #[test]
    fn module_and_version_compose() {
        let mut dir = SourceDirectory::new("src/m", Path::new("out"))
            .with_module("com.acme.app")
            .with_release(release("21"));
        dir.apply_versioned_output(release("17"));
        assert_eq!(
            dir.output(),
            Path::new("out/com.acme.app/META-INF/versions/21")
        );
    }

    #[test]
    fn nearest_descriptor_wins() {
        let mut dir = SourceDirectory::new("src", Path::new("out"));
        dir.record_descriptor(PathBuf::from("src/deep/nested/module-info.java"));
        dir.record_descriptor(PathBuf::from("src/module-info.java"));
        assert_eq!(dir.descriptor(), Some(Path::new("src/module-info.java")));

        // A later, deeper descriptor does not displace the recorded one.
        dir.record_descriptor(PathBuf::from("src/other/module-info.java"));
        assert_eq!(dir.descriptor(), Some(Path::new("src/module-info.java")));
    }

    #[test]
    fn has_filters_reflects_patterns() {
        let dir = SourceDirectory::new("src", Path::new("out"));
        assert!(!dir.has_filters());
        let dir = dir.with_filters(vec!["**/*.java".to_string()], Vec::new());
        assert!(dir.has_filters());
    }
}

//! Classified dependency paths as returned by the resolver boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of a dependency path entry, matching the compiler's notion
/// of where a set of paths should be placed.
///
/// `PatchModule` is per-module: each patched module gets its own kind so
/// the per-target placement rules of the orchestrator (each module can
/// be patched at most once per invocation) fall out of the map keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathKind {
    /// The regular classpath.
    ClassPath,
    /// The module path for named-module dependencies.
    ModulePath,
    /// The source path for the unnamed module.
    SourcePath,
    /// The module source path for module-driven compilation.
    ModuleSourcePath,
    /// The annotation-processor classpath.
    ProcessorPath,
    /// The annotation-processor module path.
    ProcessorModulePath,
    /// Additional sources/classes overlaid onto the named module.
    PatchModule(String),
}

impl PathKind {
    /// Returns the command-line option that carries this kind of path.
    pub fn option_name(&self) -> &'static str {
        match self {
            PathKind::ClassPath => "--class-path",
            PathKind::ModulePath => "--module-path",
            PathKind::SourcePath => "--source-path",
            PathKind::ModuleSourcePath => "--module-source-path",
            PathKind::ProcessorPath => "--processor-path",
            PathKind::ProcessorModulePath => "--processor-module-path",
            PathKind::PatchModule(_) => "--patch-module",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::PatchModule(module) => write!(f, "--patch-module {module}"),
            other => write!(f, "{}", other.option_name()),
        }
    }
}

/// A read-only mapping from path kind to an ordered list of filesystem
/// paths, as supplied by the external dependency resolver.
///
/// Iteration order over kinds is deterministic (kind-sorted, patch
/// targets sorted by module name). The per-kind path lists preserve the
/// order the resolver supplied, which is significant for the compiler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyPaths {
    entries: BTreeMap<PathKind, Vec<PathBuf>>,
}

impl DependencyPaths {
    /// Creates an empty path map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all paths for the given kind.
    pub fn insert(&mut self, kind: PathKind, paths: Vec<PathBuf>) {
        self.entries.insert(kind, paths);
    }

    /// Appends a single path to the given kind, creating the entry if absent.
    pub fn append(&mut self, kind: PathKind, path: impl Into<PathBuf>) {
        self.entries.entry(kind).or_default().push(path.into());
    }

    /// Returns the ordered paths for a kind, if present.
    pub fn get(&self, kind: &PathKind) -> Option<&[PathBuf]> {
        self.entries.get(kind).map(Vec::as_slice)
    }

    /// Returns `true` if no kind has any path.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Iterates over `(kind, paths)` pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathKind, &[PathBuf])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Iterates over every path of every kind (flattened), in
    /// deterministic kind order. Used by the dependency-change check.
    pub fn iter_all_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.values().flatten().map(PathBuf::as_path)
    }

    /// Convenience for adding a `--patch-module` entry for one module.
    pub fn add_patch(&mut self, module: impl Into<String>, paths: Vec<PathBuf>) {
        self.insert(PathKind::PatchModule(module.into()), paths);
    }

    /// Iterates over patched modules and their overlay paths.
    pub fn patches(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries.iter().filter_map(|(k, v)| match k {
            PathKind::PatchModule(module) => Some((module.as_str(), v.as_slice())),
            _ => None,
        })
    }
}

//! Compilation unit model.

use javelin_common::{DependencyPaths, Release};
use javelin_source::SourceFile;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All sources compiled by one tool invocation: a single target release,
/// grouped by module.
///
/// The empty-string module key holds sources of the unnamed module, which
/// travel on the plain source path. Units are produced in execution order
/// by [`group_by_release_and_module`](crate::group_by_release_and_module);
/// the base release always comes first.
#[derive(Clone, Debug)]
pub struct SourcesForRelease {
    release: Option<Release>,
    modules: BTreeMap<String, Vec<SourceFile>>,
    output: PathBuf,
    deps: DependencyPaths,
}

impl SourcesForRelease {
    pub(crate) fn new(
        release: Option<Release>,
        modules: BTreeMap<String, Vec<SourceFile>>,
        output: PathBuf,
        deps: DependencyPaths,
    ) -> Self {
        Self {
            release,
            modules,
            output,
            deps,
        }
    }

    /// The release this unit targets; `None` compiles with the tool
    /// default.
    pub fn release(&self) -> Option<Release> {
        self.release
    }

    /// The output directory for this unit's class files. Non-base units
    /// write into the `META-INF/versions/<n>` subtree of the base output.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The dependency paths in effect for this unit.
    pub fn deps(&self) -> &DependencyPaths {
        &self.deps
    }

    /// Iterates over `(module name, files)` groups in module-name order.
    /// The empty name is the unnamed module.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &[SourceFile])> {
        self.modules.iter().map(|(m, f)| (m.as_str(), f.as_slice()))
    }

    /// The named modules present in this unit, in name order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules
            .keys()
            .map(String::as_str)
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Returns `true` if any source belongs to a named module.
    pub fn has_named_modules(&self) -> bool {
        self.modules.keys().any(|m| !m.is_empty())
    }

    /// Iterates over every file of every module group.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.modules.values().flatten()
    }

    /// Total number of files in this unit.
    pub fn file_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    /// Splits this unit into the ordered tool runs that compile it.
    ///
    /// The default is a single task covering every file. With
    /// `descriptor_first` set, module descriptors compile in a task of
    /// their own before the rest; some layouts override a module
    /// descriptor from a different source root, and the override must be
    /// on the class path before its module's other sources compile.
    pub fn tasks(&self, descriptor_first: bool) -> Vec<CompilationTask> {
        let all: Vec<SourceFile> = self.files().cloned().collect();
        if !descriptor_first {
            return vec![CompilationTask { files: all }];
        }
        let (descriptors, rest): (Vec<SourceFile>, Vec<SourceFile>) =
            all.into_iter().partition(SourceFile::is_module_descriptor);
        if descriptors.is_empty() || rest.is_empty() {
            let files = if descriptors.is_empty() {
                rest
            } else {
                descriptors
            };
            return vec![CompilationTask { files }];
        }
        vec![
            CompilationTask { files: descriptors },
            CompilationTask { files: rest },
        ]
    }
}

/// The files handed to one tool run. A unit usually compiles as one task;
/// see [`SourcesForRelease::tasks`].
#[derive(Clone, Debug)]
pub struct CompilationTask {
    /// The files of this run, in scan order.
    pub files: Vec<SourceFile>,
}

//! The incremental decision engine state machine.

use crate::error::IncrementalError;
use crate::status::BuildStatus;
use javelin_common::{DependencyPaths, OptionHash};
use javelin_config::Aspects;
use javelin_source::{SourceDirectory, SourceFile};
use std::collections::BTreeSet;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};
use walkdir::WalkDir;

/// The outcome of change detection for one build.
#[derive(Debug)]
pub enum Decision {
    /// Change detection is delegated to the compiler via `--module`.
    ModuleDriven {
        /// Module names to pass, in directory order without duplicates.
        modules: Vec<String>,
    },
    /// No work to do: outputs stay untouched and the status file is not
    /// rewritten.
    NothingToCompile,
    /// Compile the selected files.
    Compile {
        /// The files to hand to the partitioner.
        files: Vec<SourceFile>,
        /// Why recompilation is needed.
        cause: RebuildCause,
    },
}

/// Why the engine decided to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildCause {
    /// No usable previous status exists.
    FirstBuild,
    /// A previously compiled source no longer exists.
    RemovedSource,
    /// A source not present in the previous build appeared.
    AddedSource,
    /// Sources are newer than their class files.
    StaleSources,
    /// A dependency path entry was modified at or after build start.
    ChangedDependency,
    /// The effective compiler options changed.
    ChangedOptions,
}

impl fmt::Display for RebuildCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RebuildCause::FirstBuild => "first build",
            RebuildCause::RemovedSource => "a source file was removed",
            RebuildCause::AddedSource => "a source file was added",
            RebuildCause::StaleSources => "sources are newer than their class files",
            RebuildCause::ChangedDependency => "a dependency changed",
            RebuildCause::ChangedOptions => "compiler options changed",
        };
        f.write_str(text)
    }
}

/// Which part of the candidate list a positive check selects.
enum Selection {
    All,
    Subset(BTreeSet<PathBuf>),
}

/// Runs the ordered change-detection checks for one build.
///
/// The checks short-circuit at the first positive cause, in a fixed
/// priority order: input-tree change, per-file staleness, dependency
/// change, option change. Later checks are more expensive, and an earlier
/// detection already implies the outcome. Which checks run at all is
/// controlled by the configured [`Aspects`].
pub struct DecisionEngine {
    aspects: Aspects,
    stale_millis: u64,
    dependency_extensions: Vec<String>,
    build_start: SystemTime,
}

impl DecisionEngine {
    /// Creates an engine with the given aspect set, zero staleness
    /// tolerance, the default `class`/`jar` dependency extensions, and the
    /// current time as build start.
    pub fn new(aspects: Aspects) -> Self {
        Self {
            aspects,
            stale_millis: 0,
            dependency_extensions: vec!["class".to_string(), "jar".to_string()],
            build_start: SystemTime::now(),
        }
    }

    /// Sets the filesystem timestamp granularity tolerance.
    pub fn with_stale_millis(mut self, millis: u64) -> Self {
        self.stale_millis = millis;
        self
    }

    /// Sets the file extensions the dependency walk considers.
    pub fn with_dependency_extensions(mut self, extensions: Vec<String>) -> Self {
        self.dependency_extensions = extensions;
        self
    }

    /// Sets the build start timestamp dependency modifications are
    /// compared against.
    pub fn with_build_start(mut self, start: SystemTime) -> Self {
        self.build_start = start;
        self
    }

    /// Decides what, if anything, must be compiled.
    ///
    /// In module-driven mode every directory must declare a module and the
    /// decision is [`Decision::ModuleDriven`] with no file enumeration. In
    /// file-enumerated mode the ordered checks run against the previous
    /// [`BuildStatus`]; a missing status is the first build and forces a
    /// full compile. On every non-skipped outcome the status is rewritten
    /// with the new snapshot and option hash before this method returns,
    /// so a failed compilation still leaves an accurate baseline for the
    /// next attempt. A skipped build leaves the status untouched.
    pub fn decide(
        &self,
        dirs: &[SourceDirectory],
        files: Vec<SourceFile>,
        deps: &DependencyPaths,
        option_hash: OptionHash,
        status_dir: &Path,
    ) -> Result<Decision, IncrementalError> {
        if self.aspects.is_module_driven() {
            let mut modules = Vec::new();
            for dir in dirs {
                match &dir.module {
                    Some(module) => {
                        if !modules.contains(module) {
                            modules.push(module.clone());
                        }
                    }
                    None => {
                        return Err(IncrementalError::MissingModuleName {
                            root: dir.root.clone(),
                        })
                    }
                }
            }
            info!(
                modules = modules.len(),
                "delegating change detection to the compiler"
            );
            return Ok(Decision::ModuleDriven { modules });
        }

        if files.is_empty() {
            info!("no sources to compile");
            return Ok(Decision::NothingToCompile);
        }

        // Files matching the incremental-exclude filter are invisible to
        // change detection: they appear in no snapshot and trigger no
        // check, but they still compile whenever a full rebuild happens.
        let tracked: BTreeSet<PathBuf> = files
            .iter()
            .filter(|f| !f.ignore_for_incremental)
            .map(|f| f.path.clone())
            .collect();

        let previous = BuildStatus::load(status_dir)?;
        let outcome = match &previous {
            None => Some((Selection::All, RebuildCause::FirstBuild)),
            Some(previous) => self.check(previous, &tracked, dirs, &files, deps, option_hash)?,
        };

        match outcome {
            None => {
                info!("nothing to compile, all outputs up to date");
                Ok(Decision::NothingToCompile)
            }
            Some((selection, cause)) => {
                BuildStatus::new(tracked, option_hash).save(status_dir)?;
                let files: Vec<SourceFile> = match selection {
                    Selection::All => files,
                    Selection::Subset(keep) => files
                        .into_iter()
                        .filter(|f| keep.contains(&f.path))
                        .collect(),
                };
                info!(%cause, files = files.len(), "recompiling");
                Ok(Decision::Compile { files, cause })
            }
        }
    }

    fn check(
        &self,
        previous: &BuildStatus,
        tracked: &BTreeSet<PathBuf>,
        dirs: &[SourceDirectory],
        files: &[SourceFile],
        deps: &DependencyPaths,
        option_hash: OptionHash,
    ) -> Result<Option<(Selection, RebuildCause)>, IncrementalError> {
        if self.aspects.contains(Aspects::SOURCES) {
            let removed: Vec<&PathBuf> = previous
                .sources
                .iter()
                .filter(|p| !tracked.contains(*p))
                .collect();
            if !removed.is_empty() {
                debug!(count = removed.len(), "sources removed since previous build");
                self.delete_orphans(&removed, dirs)?;
                return Ok(Some((Selection::All, RebuildCause::RemovedSource)));
            }
            let added: BTreeSet<PathBuf> = tracked
                .iter()
                .filter(|p| !previous.sources.contains(*p))
                .cloned()
                .collect();
            if !added.is_empty() {
                debug!(count = added.len(), "sources added since previous build");
                if self.aspects.contains(Aspects::REBUILD_ON_ADD) {
                    return Ok(Some((Selection::All, RebuildCause::AddedSource)));
                }
                return Ok(Some((Selection::Subset(added), RebuildCause::AddedSource)));
            }
        }

        if self.aspects.contains(Aspects::CLASSES) {
            let mut stale = BTreeSet::new();
            for file in files.iter().filter(|f| !f.ignore_for_incremental) {
                let Some(dir) = dirs.get(file.directory) else {
                    continue;
                };
                let Some(output) = class_output_path(dir, file) else {
                    continue;
                };
                if self.is_stale(file, &output)? {
                    stale.insert(file.path.clone());
                }
            }
            if !stale.is_empty() {
                debug!(count = stale.len(), "stale sources");
                if self.aspects.contains(Aspects::REBUILD_ON_CHANGE) {
                    return Ok(Some((Selection::All, RebuildCause::StaleSources)));
                }
                return Ok(Some((Selection::Subset(stale), RebuildCause::StaleSources)));
            }
        }

        if self.aspects.contains(Aspects::DEPENDENCIES) {
            if let Some(path) = self.changed_dependency(deps)? {
                debug!(path = %path.display(), "dependency modified since build start");
                return Ok(Some((Selection::All, RebuildCause::ChangedDependency)));
            }
        }

        if self.aspects.contains(Aspects::OPTIONS) && previous.option_hash != option_hash {
            debug!("compiler options changed since previous build");
            return Ok(Some((Selection::All, RebuildCause::ChangedOptions)));
        }

        Ok(None)
    }

    /// A source is stale when its mtime, less the granularity tolerance,
    /// is strictly newer than its class file. A missing class file is
    /// always stale.
    fn is_stale(&self, file: &SourceFile, output: &Path) -> Result<bool, IncrementalError> {
        let output_modified = match std::fs::metadata(output) {
            Ok(meta) => meta.modified().map_err(|source| IncrementalError::Io {
                path: output.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(source) => {
                return Err(IncrementalError::Io {
                    path: output.to_path_buf(),
                    source,
                })
            }
        };
        let effective = file
            .modified
            .checked_sub(Duration::from_millis(self.stale_millis))
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(effective > output_modified)
    }

    /// Walks every dependency path entry and returns the first file with
    /// a matching extension modified at or after build start. Conservative
    /// by design: the engine cannot know which symbols changed.
    fn changed_dependency(
        &self,
        deps: &DependencyPaths,
    ) -> Result<Option<PathBuf>, IncrementalError> {
        for root in deps.iter_all_paths() {
            if !root.exists() {
                continue;
            }
            for entry in WalkDir::new(root) {
                let entry = entry.map_err(|source| IncrementalError::Io {
                    path: root.to_path_buf(),
                    source: source.into(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if !self.matches_extension(entry.path()) {
                    continue;
                }
                let modified = entry
                    .metadata()
                    .map_err(|source| IncrementalError::Io {
                        path: entry.path().to_path_buf(),
                        source: source.into(),
                    })?
                    .modified()
                    .map_err(|source| IncrementalError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    })?;
                if modified >= self.build_start {
                    return Ok(Some(entry.path().to_path_buf()));
                }
            }
        }
        Ok(None)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                self.dependency_extensions
                    .iter()
                    .any(|x| x.eq_ignore_ascii_case(e))
            })
    }

    /// Deletes the class files of removed sources, including nested-class
    /// siblings (`Foo$Inner.class`). A removed source whose root cannot be
    /// matched against the current directory list is skipped.
    fn delete_orphans(
        &self,
        removed: &[&PathBuf],
        dirs: &[SourceDirectory],
    ) -> Result<(), IncrementalError> {
        for path in removed {
            let Some((dir, relative)) = owning_directory(dirs, path) else {
                continue;
            };
            let output = dir.output().join(relative).with_extension("class");
            remove_class_and_inners(&output)?;
        }
        Ok(())
    }
}

/// The class file a source compiles to, derived from its directory's
/// output and the source's root-relative path.
fn class_output_path(dir: &SourceDirectory, file: &SourceFile) -> Option<PathBuf> {
    let relative = file.relative_to(&dir.root)?;
    Some(dir.output().join(relative).with_extension("class"))
}

fn owning_directory<'a>(
    dirs: &'a [SourceDirectory],
    path: &'a Path,
) -> Option<(&'a SourceDirectory, &'a Path)> {
    dirs.iter()
        .find_map(|d| path.strip_prefix(&d.root).ok().map(|rel| (d, rel)))
}

fn remove_class_and_inners(output: &Path) -> Result<(), IncrementalError> {
    match std::fs::remove_file(output) {
        Ok(()) => debug!(path = %output.display(), "deleted orphaned output"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(IncrementalError::Io {
                path: output.to_path_buf(),
                source,
            })
        }
    }
    let Some(stem) = output.file_stem().and_then(|s| s.to_str()) else {
        return Ok(());
    };
    let Some(parent) = output.parent() else {
        return Ok(());
    };
    let prefix = format!("{stem}$");
    let entries = match std::fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(IncrementalError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
    };
    for entry in entries {
        let entry = entry.map_err(|source| IncrementalError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(&prefix) && name.ends_with(".class") {
            std::fs::remove_file(entry.path()).map_err(|source| IncrementalError::Io {
                path: entry.path(),
                source,
            })?;
        }
    }
    Ok(())
}

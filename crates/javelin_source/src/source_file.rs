//! Scanned source file records.

use crate::MODULE_DESCRIPTOR;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single source file produced by the scan phase.
///
/// Belongs to exactly one [`SourceDirectory`](crate::SourceDirectory),
/// referenced by index into the scanned directory list. Immutable after
/// the scan.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Index of the owning directory in the scanned directory list.
    pub directory: usize,
    /// Last-modified time captured during the scan.
    pub modified: SystemTime,
    /// When set, this file compiles on full builds but its modification
    /// alone never triggers a rebuild.
    pub ignore_for_incremental: bool,
}

impl SourceFile {
    /// Creates a source file record.
    pub fn new(path: impl Into<PathBuf>, directory: usize, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            directory,
            modified,
            ignore_for_incremental: false,
        }
    }

    /// Returns `true` if this file is a module descriptor.
    pub fn is_module_descriptor(&self) -> bool {
        self.path
            .file_name()
            .is_some_and(|name| name == MODULE_DESCRIPTOR)
    }

    /// The path of this file relative to its directory root, when it lies
    /// under `root`.
    pub fn relative_to<'a>(&'a self, root: &Path) -> Option<&'a Path> {
        self.path.strip_prefix(root).ok()
    }
}

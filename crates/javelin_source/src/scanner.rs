//! Recursive source tree walker.

use crate::directory::{DirectoryKind, SourceDirectory};
use crate::error::ScanError;
use crate::filter::{PathMatcher, ScanFilters};
use crate::source_file::SourceFile;
use crate::MODULE_DESCRIPTOR;
use tracing::debug;
use walkdir::WalkDir;

/// Walks every source directory and produces the candidate file list.
///
/// Caller-level `filters` apply uniformly; per-directory patterns apply on
/// top, and a file must pass both sets. Files matching the
/// incremental-exclude filter are returned with
/// [`ignore_for_incremental`](SourceFile::ignore_for_incremental) set.
/// While walking, each directory records its module descriptor (nearest
/// the root wins). Entries are visited in file-name order so the result
/// is deterministic for a given tree.
///
/// In module-driven mode the compiler enumerates sources itself: the scan
/// returns no files, and any configured filter (caller-level or
/// per-directory) is a configuration error since it could not be honored.
///
/// Directories whose root does not exist are skipped; generated-source
/// roots legitimately appear only after a processing round has run.
pub fn walk_source_files(
    dirs: &mut [SourceDirectory],
    filters: &ScanFilters,
    module_driven: bool,
) -> Result<Vec<SourceFile>, ScanError> {
    if module_driven {
        if filters.has_user_filters() || dirs.iter().any(|d| d.has_filters()) {
            return Err(ScanError::FiltersWithModuleDriven);
        }
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for (index, dir) in dirs.iter_mut().enumerate() {
        if dir.kind != DirectoryKind::JavaSources {
            continue;
        }
        if !dir.root.exists() {
            debug!(root = %dir.root.display(), "skipping missing source root");
            continue;
        }
        let dir_matcher = PathMatcher::new(&dir.includes, &dir.excludes)?;
        for entry in WalkDir::new(&dir.root).sort_by_file_name() {
            let entry = entry.map_err(|source| ScanError::WalkError {
                path: dir.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&dir.root) else {
                continue;
            };
            if path.file_name().is_some_and(|n| n == MODULE_DESCRIPTOR) {
                dir.record_descriptor(path.to_path_buf());
            }
            if !filters.matches(relative) || !dir_matcher.matches(relative) {
                continue;
            }
            let modified = entry
                .metadata()
                .map_err(|source| ScanError::WalkError {
                    path: dir.root.clone(),
                    source,
                })?
                .modified()
                .map_err(|source| ScanError::MetadataError {
                    path: path.to_path_buf(),
                    source,
                })?;
            let mut file = SourceFile::new(path, index, modified);
            file.ignore_for_incremental = filters.is_incremental_excluded(relative);
            files.push(file);
        }
    }
    debug!(count = files.len(), "scanned source files");
    Ok(files)
}

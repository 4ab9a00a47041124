//! Grouping of scanned files into release/module units.

use crate::unit::SourcesForRelease;
use javelin_common::{DependencyPaths, Release};
use javelin_source::{SourceDirectory, SourceFile};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// The build-wide base release: the lowest release any directory declares,
/// or `None` when no directory declares one.
///
/// Directories without a declared release compile as part of the base
/// unit. The same definition drives the versioned-output suffix on
/// [`SourceDirectory`], so partitioning and per-directory outputs agree.
pub fn base_release(dirs: &[SourceDirectory]) -> Option<Release> {
    dirs.iter().filter_map(|d| d.release).min()
}

/// Groups files by target release and module into ordered compilation
/// units.
///
/// Each file inherits release and module from its owning directory. The
/// base unit collects every directory declaring no release or the base
/// release itself and always executes first; remaining units follow in
/// ascending release order and write into `META-INF/versions/<n>` under
/// the base output. Within a unit, files group by module name with the
/// empty key for the unnamed module. Every unit carries the same
/// dependency path snapshot.
pub fn group_by_release_and_module(
    files: Vec<SourceFile>,
    dirs: &[SourceDirectory],
    base_output: &Path,
    deps: &DependencyPaths,
) -> Vec<SourcesForRelease> {
    let base = base_release(dirs);

    // Option<Release> orders None first, and the base is the minimum of
    // the declared releases, so ascending key order is execution order.
    let mut grouped: BTreeMap<Option<Release>, BTreeMap<String, Vec<SourceFile>>> =
        BTreeMap::new();
    for file in files {
        let Some(dir) = dirs.get(file.directory) else {
            continue;
        };
        let release = match dir.release {
            Some(r) if Some(r) != base => Some(r),
            _ => base,
        };
        let module = dir.module.clone().unwrap_or_default();
        grouped
            .entry(release)
            .or_default()
            .entry(module)
            .or_default()
            .push(file);
    }

    let units: Vec<SourcesForRelease> = grouped
        .into_iter()
        .map(|(release, modules)| {
            let output = match (release, base) {
                (Some(r), Some(b)) if r > b => base_output
                    .join("META-INF")
                    .join("versions")
                    .join(r.feature().to_string()),
                _ => base_output.to_path_buf(),
            };
            SourcesForRelease::new(release, modules, output, deps.clone())
        })
        .collect();
    debug!(units = units.len(), "partitioned sources");
    units
}

/// Builds the single unit used when change detection is delegated to the
/// compiler.
///
/// The tool enumerates sources from the module source path itself, so the
/// unit names the modules to compile but carries no files. The caller
/// passes the names to the tool via `--module`.
pub fn module_driven_unit(
    modules: &[String],
    dirs: &[SourceDirectory],
    base_output: &Path,
    deps: &DependencyPaths,
) -> SourcesForRelease {
    let named: BTreeMap<String, Vec<SourceFile>> = modules
        .iter()
        .map(|module| (module.clone(), Vec::new()))
        .collect();
    SourcesForRelease::new(base_release(dirs), named, base_output.to_path_buf(), deps.clone())
}

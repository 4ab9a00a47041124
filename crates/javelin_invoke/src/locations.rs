//! Placement of dependency paths onto the tool's location API.

use crate::error::InvokeError;
use javelin_common::PathKind;
use javelin_options::OptionChecker;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::warn;

#[cfg(windows)]
const PATH_LIST_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: &str = ":";

/// Outcome of a typed placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The location API accepted the paths.
    Accepted,
    /// The location API does not know this path kind.
    Unsupported,
}

/// The typed location API of a tool's file manager.
///
/// An implementation accepts the path kinds it can represent natively and
/// reports [`Placement::Unsupported`] for the rest. Locations are acquired
/// once per build and reused across that build's units, never across
/// builds.
pub trait StandardLocations {
    /// Places `paths` under `kind`.
    fn set_location(
        &mut self,
        kind: &PathKind,
        paths: &[PathBuf],
    ) -> Result<Placement, InvokeError>;
}

/// The location story of a forked tool: there is no typed API, so every
/// kind falls back to its command-line option.
#[derive(Debug, Default)]
pub struct CommandLineLocations;

impl StandardLocations for CommandLineLocations {
    fn set_location(
        &mut self,
        _kind: &PathKind,
        _paths: &[PathBuf],
    ) -> Result<Placement, InvokeError> {
        Ok(Placement::Unsupported)
    }
}

/// Command-line fallback for path kinds the location API rejects.
///
/// Each rejected kind becomes its verbatim option, at most once per
/// distinct target. A second fallback for the same patched module means
/// the placement plan itself is wrong; that is reported as an internal
/// error rather than silently overriding the first placement. Kinds the
/// tool cannot take either way are collected and surfaced as one
/// aggregated warning when the unit's placements [`finish`](Self::finish);
/// placement never fails the build.
pub struct LocationFallback<'a> {
    locations: &'a mut dyn StandardLocations,
    options: Vec<String>,
    patched: BTreeSet<String>,
    unplaceable: Vec<PathKind>,
}

impl<'a> LocationFallback<'a> {
    /// Wraps the build's location API for one unit's placements.
    pub fn new(locations: &'a mut dyn StandardLocations) -> Self {
        Self {
            locations,
            options: Vec::new(),
            patched: BTreeSet::new(),
            unplaceable: Vec::new(),
        }
    }

    /// Places one path kind, falling back to its command-line option when
    /// the location API does not support it.
    pub fn place(
        &mut self,
        kind: &PathKind,
        paths: &[PathBuf],
        checker: &dyn OptionChecker,
    ) -> Result<(), InvokeError> {
        if paths.is_empty() {
            return Ok(());
        }
        match self.locations.set_location(kind, paths)? {
            Placement::Accepted => Ok(()),
            Placement::Unsupported => self.fall_back(kind, paths, checker),
        }
    }

    fn fall_back(
        &mut self,
        kind: &PathKind,
        paths: &[PathBuf],
        checker: &dyn OptionChecker,
    ) -> Result<(), InvokeError> {
        if let PathKind::PatchModule(module) = kind {
            if !self.patched.insert(module.clone()) {
                return Err(InvokeError::DuplicatePatchTarget {
                    module: module.clone(),
                });
            }
        }
        let option = kind.option_name();
        if checker.accepted_arity(option) == Some(1) {
            self.options.push(option.to_string());
            self.options.push(fallback_value(kind, paths));
        } else {
            self.unplaceable.push(kind.clone());
        }
        Ok(())
    }

    /// Finishes this unit's placements: one aggregated warning for the
    /// kinds that could be placed nowhere, and the fallback options for
    /// the invocation.
    pub fn finish(self) -> Vec<String> {
        if !self.unplaceable.is_empty() {
            let kinds: Vec<String> = self.unplaceable.iter().map(PathKind::to_string).collect();
            warn!(
                "dependency paths could not be placed anywhere: {}",
                kinds.join(", ")
            );
        }
        self.options
    }
}

/// The option value for a fallback placement: paths joined with the
/// platform list separator, prefixed with the target module for patch
/// placements.
fn fallback_value(kind: &PathKind, paths: &[PathBuf]) -> String {
    let joined = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(PATH_LIST_SEPARATOR);
    match kind {
        PathKind::PatchModule(module) => format!("{module}={joined}"),
        _ => joined,
    }
}

/// Shared `--add-modules` / `--limit-modules` accumulation.
///
/// Patch placements for several modules contribute to the same two sets.
/// The context is passed explicitly to every writer, so the sets have a
/// single owner and the final options are emitted exactly once per
/// invocation.
#[derive(Debug, Default)]
pub struct ModuleOptionContext {
    add_modules: BTreeSet<String>,
    limit_modules: BTreeSet<String>,
}

impl ModuleOptionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a module for `--add-modules`.
    pub fn add_module(&mut self, module: impl Into<String>) {
        self.add_modules.insert(module.into());
    }

    /// Records a module for `--limit-modules`.
    pub fn limit_module(&mut self, module: impl Into<String>) {
        self.limit_modules.insert(module.into());
    }

    /// Appends the accumulated options, if any, to an option list.
    pub fn append_to(&self, options: &mut Vec<String>) {
        if !self.add_modules.is_empty() {
            options.push("--add-modules".to_string());
            options.push(join(&self.add_modules));
        }
        if !self.limit_modules.is_empty() {
            options.push("--limit-modules".to_string());
            options.push(join(&self.limit_modules));
        }
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.add_modules.is_empty() && self.limit_modules.is_empty()
    }
}

fn join(modules: &BTreeSet<String>) -> String {
    modules.iter().cloned().collect::<Vec<_>>().join(",")
}

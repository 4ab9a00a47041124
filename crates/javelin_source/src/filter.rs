//! Glob-based include/exclude matching for the scan phase.

use crate::error::ScanError;
use glob::Pattern;
use std::path::Path;

/// The default include pattern when the caller supplies none.
pub const DEFAULT_INCLUDE: &str = "**/*.java";

/// A compiled include/exclude matcher.
///
/// Patterns match the path of a file relative to its source root. An empty
/// include list passes everything; excludes always win over includes.
#[derive(Debug, Default)]
pub struct PathMatcher {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PathMatcher {
    /// Compiles a matcher from include and exclude pattern strings.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, ScanError> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// Returns `true` if `relative` passes the includes (or no includes are
    /// set) and matches no exclude.
    pub fn matches(&self, relative: &Path) -> bool {
        let included = self.includes.is_empty()
            || self.includes.iter().any(|p| p.matches_path(relative));
        included && !self.excludes.iter().any(|p| p.matches_path(relative))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, ScanError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ScanError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// The caller-level filter set for one scan.
///
/// Holds the uniform include/exclude matcher (with the `**/*.java` default
/// applied when the caller supplied no includes) and the separate
/// incremental-exclude matcher that marks files as present-but-ignorable
/// for change detection.
#[derive(Debug)]
pub struct ScanFilters {
    matcher: PathMatcher,
    incremental_excludes: Vec<Pattern>,
    user_filtered: bool,
}

impl ScanFilters {
    /// Compiles the caller-level filter set.
    pub fn new(
        includes: &[String],
        excludes: &[String],
        incremental_excludes: &[String],
    ) -> Result<Self, ScanError> {
        let user_filtered =
            !includes.is_empty() || !excludes.is_empty() || !incremental_excludes.is_empty();
        let default_includes = [DEFAULT_INCLUDE.to_string()];
        let effective_includes: &[String] = if includes.is_empty() {
            &default_includes
        } else {
            includes
        };
        Ok(Self {
            matcher: PathMatcher::new(effective_includes, excludes)?,
            incremental_excludes: compile(incremental_excludes)?,
            user_filtered,
        })
    }

    /// Returns `true` if `relative` passes the caller-level filters.
    pub fn matches(&self, relative: &Path) -> bool {
        self.matcher.matches(relative)
    }

    /// Returns `true` if `relative` matches the incremental-exclude filter.
    pub fn is_incremental_excluded(&self, relative: &Path) -> bool {
        self.incremental_excludes
            .iter()
            .any(|p| p.matches_path(relative))
    }

    /// Whether the caller supplied any filter pattern at all, before the
    /// default include was applied.
    pub fn has_user_filters(&self) -> bool {
        self.user_filtered
    }
}

//! The dependency-resolution boundary.

use javelin_common::{DependencyPaths, PathKind};
use std::fmt;
use std::mem;

/// The dependency scope of a resolution request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Main compilation.
    Main,
    /// Test compilation, which additionally sees the main outputs.
    Test,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Main => "main",
            Scope::Test => "test",
        })
    }
}

/// Classified paths plus the non-fatal warnings resolution produced.
#[derive(Debug, Default)]
pub struct Resolution {
    /// The classified dependency paths.
    pub paths: DependencyPaths,
    /// Non-fatal resolution warnings for the caller to surface.
    pub warnings: Vec<String>,
}

/// A resolution failure: the first fatal error, with any further errors
/// attached as suppressed context instead of being lost.
#[derive(Debug, thiserror::Error)]
#[error("dependency resolution failed: {message}")]
pub struct ResolveError {
    message: String,
    suppressed: Vec<String>,
}

impl ResolveError {
    /// Creates a resolution error from the first fatal failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suppressed: Vec::new(),
        }
    }

    /// Attaches a subsequent failure as suppressed.
    pub fn suppress(&mut self, message: impl Into<String>) {
        self.suppressed.push(message.into());
    }

    /// The suppressed failures, in occurrence order.
    pub fn suppressed(&self) -> &[String] {
        &self.suppressed
    }
}

/// Resolves project dependencies into classified paths.
///
/// The accepted-kind set narrows what the build can place: a project
/// without a module descriptor has no module path to put anything on, so
/// its resolver requests carry fewer kinds and the resolver classifies
/// accordingly.
pub trait DependencyResolver {
    /// Resolves dependencies for `scope`, restricted to `accepted` kinds.
    fn resolve(&self, scope: Scope, accepted: &[PathKind]) -> Result<Resolution, ResolveError>;
}

/// Returns `true` when `kind` belongs to the same category as any entry
/// of `accepted`, ignoring patch targets.
pub fn kind_accepted(kind: &PathKind, accepted: &[PathKind]) -> bool {
    accepted
        .iter()
        .any(|a| mem::discriminant(a) == mem::discriminant(kind))
}

/// A resolver over fixed, pre-classified paths.
///
/// Hosts with a real dependency manager implement [`DependencyResolver`]
/// themselves; this covers explicit path configuration and the test
/// fixtures. Paths of kinds outside the accepted set are dropped with a
/// warning per kind.
#[derive(Debug, Default)]
pub struct FixedResolver {
    main: DependencyPaths,
    test: DependencyPaths,
}

impl FixedResolver {
    /// Creates a resolver answering main-scope requests with `main`.
    pub fn new(main: DependencyPaths) -> Self {
        Self {
            main,
            test: DependencyPaths::new(),
        }
    }

    /// Sets the paths answered for test scope.
    pub fn with_test(mut self, test: DependencyPaths) -> Self {
        self.test = test;
        self
    }
}

impl DependencyResolver for FixedResolver {
    fn resolve(&self, scope: Scope, accepted: &[PathKind]) -> Result<Resolution, ResolveError> {
        let source = match scope {
            Scope::Main => &self.main,
            Scope::Test => &self.test,
        };
        let mut resolution = Resolution::default();
        for (kind, paths) in source.iter() {
            if kind_accepted(kind, accepted) {
                resolution.paths.insert(kind.clone(), paths.to_vec());
            } else {
                resolution
                    .warnings
                    .push(format!("dropping {kind} paths, not accepted in this build"));
            }
        }
        Ok(resolution)
    }
}

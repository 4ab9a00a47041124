//! Partitioning of scanned sources into ordered compilation units.
//!
//! Multi-release and modular builds cannot run as one compiler call: each
//! target release is a separate invocation, and the base release must be
//! compiled first so later releases can see its classes. This crate groups
//! [`SourceFile`](javelin_source::SourceFile)s by target release and module
//! into [`SourcesForRelease`] units and fixes their execution order.

#![warn(missing_docs)]

pub mod group;
pub mod unit;

pub use group::{base_release, group_by_release_and_module, module_driven_unit};
pub use unit::{CompilationTask, SourcesForRelease};

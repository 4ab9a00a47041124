//! Source tree model and scanner: directories, files, filters, and the
//! project capability interface.
//!
//! The scanner walks each [`SourceDirectory`] and produces the flat
//! [`SourceFile`] list the incremental engine and partitioner operate on.
//! Filtering is glob-based: caller-level filters apply to every directory,
//! per-directory filters apply on top, and a separate incremental-exclude
//! filter marks files that compile on full builds but never trigger one.

#![warn(missing_docs)]

pub mod directory;
pub mod error;
pub mod filter;
pub mod project;
pub mod scanner;
pub mod source_file;

pub use directory::{DirectoryKind, SourceDirectory};
pub use error::ScanError;
pub use filter::{PathMatcher, ScanFilters};
pub use project::ProjectLayout;
pub use scanner::walk_source_files;
pub use source_file::SourceFile;

/// File name of the Java module descriptor.
pub const MODULE_DESCRIPTOR: &str = "module-info.java";

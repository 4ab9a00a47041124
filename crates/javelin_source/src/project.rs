//! Host-project capability interface.

use std::path::PathBuf;

/// The slice of a host project the compilation core needs to see.
///
/// The engine and partitioner never depend on a concrete host type; they
/// consume scanned data plus this interface. The CLI provides the
/// TOML-backed implementation, tests provide fixture implementations.
pub trait ProjectLayout {
    /// Root directories scanned for compile sources.
    fn compile_source_roots(&self) -> Vec<PathBuf>;

    /// Directory receiving compiled class files.
    fn output_directory(&self) -> PathBuf;

    /// Caller-level include patterns; empty means the default
    /// [`DEFAULT_INCLUDE`](crate::filter::DEFAULT_INCLUDE).
    fn includes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Caller-level exclude patterns.
    fn excludes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Patterns for sources compiled on full builds but ignored as
    /// rebuild triggers.
    fn incremental_excludes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Directory receiving sources generated by annotation processing,
    /// when processing is active.
    fn generated_sources_directory(&self) -> Option<PathBuf> {
        None
    }
}

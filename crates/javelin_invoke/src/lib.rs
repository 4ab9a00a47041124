//! Compiler-tool invocation.
//!
//! This crate turns partitioned compilation units into actual tool runs:
//! dependency paths are placed through the tool's typed location API with
//! a guarded command-line fallback, units execute strictly in partition
//! order, every run can be dumped as a reusable `javac @file` argfile, and
//! compiled module descriptors get their class-file version corrected
//! where the tool writes the wrong one. [`ForkedJavac`] implements the
//! [`CompilerTool`] boundary by spawning a real `javac`; tests drive the
//! executor with scripted in-memory tools.

#![warn(missing_docs)]

pub mod descriptor;
pub mod dump;
pub mod error;
pub mod executor;
pub mod forked;
pub mod locations;
pub mod resolver;
pub mod tool;

pub use descriptor::{patch_descriptor_version, DESCRIPTOR_FIX_RELEASE};
pub use dump::{render_argfile, write_argfile};
pub use error::InvokeError;
pub use executor::Executor;
pub use forked::ForkedJavac;
pub use locations::{
    CommandLineLocations, LocationFallback, ModuleOptionContext, Placement, StandardLocations,
};
pub use resolver::{DependencyResolver, FixedResolver, Resolution, ResolveError, Scope};
pub use tool::{CompilerTool, Invocation};

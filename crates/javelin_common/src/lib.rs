//! Shared foundational types used across the Javelin compilation driver.
//!
//! This crate provides the leaf types every other Javelin crate builds on:
//! the best-effort option-list hash, the Java release version value type,
//! and the classified dependency path map handed over by the resolver.

#![warn(missing_docs)]

pub mod hash;
pub mod paths;
pub mod release;

pub use hash::OptionHash;
pub use paths::{DependencyPaths, PathKind};
pub use release::{ParseReleaseError, Release};

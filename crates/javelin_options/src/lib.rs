//! Compiler option list construction with tool capability checking.
//!
//! [`Options`] accumulates the ordered option list handed to the compiler.
//! Every append goes through an [`OptionChecker`], the capability query the
//! tool exposes; a rejected option is omitted with exactly one warning and
//! never fails the build. [`build_standard_options`] assembles the
//! canonical list from a [`CompilerConfig`](javelin_config::CompilerConfig).

#![warn(missing_docs)]

pub mod checker;
pub mod options;
pub mod standard;

pub use checker::{OptionChecker, StandardChecker};
pub use options::Options;
pub use standard::build_standard_options;

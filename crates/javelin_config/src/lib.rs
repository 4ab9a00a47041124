//! Parsing and validation of `javelin.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a
//! strongly-typed [`CompilerConfig`], plus the parser for the
//! incremental-aspect descriptor string ([`Aspects`]).

#![warn(missing_docs)]

pub mod aspects;
pub mod error;
pub mod loader;
pub mod types;

pub use aspects::{parse_aspects, Aspects};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;

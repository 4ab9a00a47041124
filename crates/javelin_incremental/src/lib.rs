//! Incremental-build decision engine and its persisted status.
//!
//! [`BuildStatus`] records what the previous build saw: the absolute source
//! path set and the option hash. [`DecisionEngine`] compares the current
//! scan against that record through the ordered aspect checks and produces
//! a [`Decision`]: delegate to the compiler, skip, or compile a (possibly
//! reduced) file list with a recorded cause.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod status;

pub use engine::{Decision, DecisionEngine, RebuildCause};
pub use error::IncrementalError;
pub use status::BuildStatus;

//! Compiler diagnostics: severity, structured messages, and rendering.
//!
//! This crate defines the [`Diagnostic`] records the compiler tool pushes
//! while it runs, the thread-safe [`DiagnosticSink`] that accumulates them
//! (the "diagnostic listener" of the tool boundary), and the
//! [`DiagnosticRenderer`] implementations that format them for terminal
//! or JSON output.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod render;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use render::{DiagnosticRenderer, PlainRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;

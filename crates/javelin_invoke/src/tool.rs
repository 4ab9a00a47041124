//! The compiler tool boundary.

use crate::error::InvokeError;
use javelin_common::Release;
use javelin_diagnostics::DiagnosticSink;
use javelin_options::OptionChecker;
use std::path::PathBuf;

/// One fully prepared tool run.
///
/// The executor prepares invocations on the calling thread; the struct is
/// plain data and `Send`, so a host may hand it to a background thread for
/// the actual run.
#[derive(Clone, Debug)]
pub struct Invocation {
    /// Finalized option entries, in order.
    pub options: Vec<String>,
    /// Source files to compile, in scan order.
    pub files: Vec<PathBuf>,
    /// Class-output directory for this run.
    pub output: PathBuf,
}

/// A Java compiler the executor can drive.
///
/// The capability half of the contract is the [`OptionChecker`]
/// supertrait: option assembly asks the tool which options it takes and
/// with how many arguments, and silently drops what it rejects. The
/// execution half is [`run`](Self::run), which streams diagnostics into
/// the sink as they are produced.
pub trait CompilerTool: OptionChecker {
    /// Short tool name for logs and failure hints.
    fn name(&self) -> &str;

    /// The feature release of the tool itself, not of the sources it
    /// compiles.
    fn release(&self) -> Release;

    /// Runs one invocation.
    ///
    /// Returns `Ok(true)` when compilation succeeded and `Ok(false)` when
    /// sources failed to compile; diagnostics for both land in `sink`.
    /// `Err` is reserved for the tool itself being unusable.
    fn run(&self, invocation: &Invocation, sink: &DiagnosticSink) -> Result<bool, InvokeError>;
}

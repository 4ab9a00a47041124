//! Tool capability queries.

/// Capability query a compiler tool exposes for its option surface.
///
/// Mirrors the standard tool-API contract: given an option string, the tool
/// reports how many following arguments the option consumes, or that it
/// does not support the option at all.
pub trait OptionChecker {
    /// Returns the number of arguments `option` takes, or `None` when the
    /// tool does not support the option.
    fn accepted_arity(&self, option: &str) -> Option<u8>;
}

/// Capability table of the standard `javac` option surface.
///
/// Used when the tool cannot be queried directly, such as a forked
/// compiler process. Self-contained options that embed their value after a
/// colon (`-g:lines`, `-proc:only`, `-Xlint:unchecked`) and runtime
/// pass-through options (`-J...`) report arity 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardChecker;

impl OptionChecker for StandardChecker {
    fn accepted_arity(&self, option: &str) -> Option<u8> {
        if option.starts_with("-g:")
            || option.starts_with("-proc:")
            || option.starts_with("-Xlint")
            || option.starts_with("-J")
        {
            return Some(0);
        }
        match option {
            "-g" | "-nowarn" | "-verbose" | "-deprecation" | "-parameters" | "-Werror"
            | "--enable-preview" | "-Xdiags:compact" | "-Xdiags:verbose" => Some(0),
            "--release" | "-source" | "--source" | "-target" | "--target" | "-encoding"
            | "-processor" | "--module-version" | "--module" | "-m" | "-d" | "-s" | "-h"
            | "--class-path" | "-classpath" | "-cp" | "--module-path" | "-p"
            | "--source-path" | "-sourcepath" | "--module-source-path"
            | "--processor-path" | "-processorpath" | "--processor-module-path"
            | "--patch-module" | "--add-modules" | "--limit-modules" | "--add-exports"
            | "--add-reads" => Some(1),
            _ => None,
        }
    }
}

//! Assembly of the canonical option list from configuration.

use crate::checker::OptionChecker;
use crate::options::Options;
use javelin_config::CompilerConfig;

/// Lint categories accepted by current `javac` releases, used to name the
/// offending sub-value when the tool rejects a `-Xlint` option.
const LINT_VALUES: &[&str] = &[
    "all",
    "auxiliaryclass",
    "cast",
    "classfile",
    "dep-ann",
    "deprecation",
    "divzero",
    "empty",
    "exports",
    "fallthrough",
    "finally",
    "missing-explicit-ctor",
    "module",
    "none",
    "opens",
    "options",
    "overloads",
    "overrides",
    "path",
    "preview",
    "processing",
    "rawtypes",
    "removal",
    "requires-automatic",
    "requires-transitive-automatic",
    "serial",
    "static",
    "strictfp",
    "synchronization",
    "text-blocks",
    "this-escape",
    "try",
    "unchecked",
    "varargs",
];

/// Debug info categories accepted after `-g:`.
const DEBUG_LEVELS: &[&str] = &["lines", "vars", "source", "none"];

/// Builds the standard option list for one build from the configuration.
///
/// Produces the stable part of the command line: language level, encoding,
/// debug info, warnings, annotation processing, lint, and forked-runtime
/// memory settings, followed by the verbatim `compiler_args` passthrough.
/// Per-unit options such as `-d` and the path options are placed later by
/// the invocation layer. `has_module` gates `--module-version`, which the
/// compiler only accepts when a module descriptor is being compiled.
pub fn build_standard_options(
    config: &CompilerConfig,
    checker: &dyn OptionChecker,
    has_module: bool,
) -> Options {
    let mut options = Options::new();
    let compiler = &config.compiler;

    if compiler.debug {
        if compiler.debug_levels.is_empty() {
            options.add_if_true(checker, "-g", true);
        } else {
            options.add_comma_separated(
                checker,
                "-g",
                &compiler.debug_levels.join(","),
                DEBUG_LEVELS,
                None,
            );
        }
    } else {
        options.add_if_true(checker, "-g:none", true);
    }

    options.add_if_true(checker, "-nowarn", !compiler.show_warnings);
    options.add_if_true(checker, "-Werror", compiler.fail_on_warning);
    options.add_if_true(checker, "-deprecation", compiler.show_deprecation);
    options.add_if_true(checker, "-parameters", compiler.parameters);
    options.add_if_true(checker, "--enable-preview", compiler.enable_preview);
    options.add_if_true(checker, "-verbose", compiler.verbose);

    if compiler.release.is_some() {
        options.add_if_non_blank(checker, "--release", compiler.release.as_deref());
    } else {
        options.add_if_non_blank(checker, "-source", compiler.source.as_deref());
        options.add_if_non_blank(checker, "-target", compiler.target.as_deref());
    }
    options.add_if_non_blank(checker, "-encoding", compiler.encoding.as_deref());

    if let Some(mode) = compiler.proc {
        options.add_if_true(checker, &format!("-proc:{}", mode.option_value()), true);
    }
    if !compiler.processors.is_empty() {
        let processors = compiler.processors.join(",");
        options.add_if_non_blank(checker, "-processor", Some(processors.as_str()));
    }
    if has_module {
        options.add_if_non_blank(checker, "--module-version", Some(config.project.version.as_str()));
    }

    if !compiler.lint.is_empty() {
        let collapse_all = |values: Vec<String>| {
            if values.iter().any(|v| v == "all") {
                Vec::new()
            } else {
                values
            }
        };
        options.add_comma_separated(
            checker,
            "-Xlint",
            &compiler.lint.join(","),
            LINT_VALUES,
            Some(&collapse_all),
        );
    }

    if compiler.fork {
        if let Some(value) = &compiler.initial_memory {
            options.add_memory_value("-J-Xms", "initial heap size", value, true);
        }
        if let Some(value) = &compiler.max_memory {
            options.add_memory_value("-J-Xmx", "maximum heap size", value, true);
        }
    }

    for arg in &compiler.compiler_args {
        options.add_raw(arg);
    }

    options
}

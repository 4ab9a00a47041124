//! Javelin CLI, the command-line driver for the Javelin Java build tool.
//!
//! Provides `javelin build` for incremental compilation of a project's
//! Java sources and `javelin clean` for removing the build outputs. The
//! CLI is thin host glue: it parses `javelin.toml`, adapts it to the
//! compilation core's interfaces, and runs the pipeline. All decision
//! logic lives in the library crates.

#![warn(missing_docs)]

mod build;
mod clean;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Javelin: incremental Java compilation.
#[derive(Parser, Debug)]
#[command(name = "javelin", version, about = "Javelin Java build tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `javelin.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the project's Java sources.
    Build(BuildArgs),
    /// Remove the class output, build status, and generated-source
    /// directories.
    Clean,
}

/// Arguments for the `javelin build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Discard the previous build status and recompile everything.
    #[arg(long)]
    pub force: bool,

    /// Write the compiler argfile dump for every run, not only on failure.
    #[arg(long)]
    pub dump: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean => clean::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the tracing subscriber on stderr.
///
/// `RUST_LOG` overrides the level chosen from the flags; without it,
/// `--quiet` shows errors only, `--verbose` shows debug, and the default
/// shows warnings (progress lines are printed separately, diagnostics go
/// through the sink).
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["javelin", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(!args.force);
                assert!(!args.dump);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from(["javelin", "build", "--force", "--dump"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.force);
                assert!(args.dump);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_clean() {
        let cli = Cli::parse_from(["javelin", "clean"]);
        assert!(matches!(cli.command, Command::Clean));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["javelin", "--quiet", "--color", "never", "build"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["javelin", "--verbose", "clean"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_color_always() {
        let cli = Cli::parse_from(["javelin", "--color", "always", "build"]);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["javelin", "--config", "/path/to/javelin.toml", "build"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/javelin.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["javelin", "build", "--quiet"]);
        assert!(cli.quiet);
    }
}

//! `javelin build`, the incremental compilation pipeline.
//!
//! Loads `javelin.toml`, scans the source roots, asks the decision engine
//! what must be compiled, partitions the answer into ordered units, and
//! drives the compiler over them. The full pipeline:
//!
//! 1. Find project root (walk up looking for `javelin.toml`)
//! 2. Load config via `javelin_config`
//! 3. Construct source directories and scan for `.java` files
//! 4. Probe the `javac` to use and assemble the option list
//! 5. Resolve dependency paths (fixed lists from config)
//! 6. Decide: skip, delegate to the compiler, or compile a file set
//! 7. Partition into release/module units and execute them in order
//! 8. Render diagnostics and report the outcome

use std::fs;
use std::io::ErrorKind;
use std::time::Instant;

use javelin_common::PathKind;
use javelin_config::parse_aspects;
use javelin_diagnostics::{DiagnosticRenderer, DiagnosticSink, PlainRenderer};
use javelin_incremental::{Decision, DecisionEngine};
use javelin_invoke::{
    CommandLineLocations, DependencyResolver, Executor, FixedResolver, ForkedJavac, Scope,
};
use javelin_options::build_standard_options;
use javelin_partition::{group_by_release_and_module, module_driven_unit};
use javelin_source::{walk_source_files, ProjectLayout};
use tracing::{info, warn};

use crate::pipeline::{self, TomlLayout};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `javelin build` command.
///
/// Returns exit code 0 on success, including the no-op cases (skip flag,
/// no sources, everything up to date). A failed compilation is an error
/// carrying the first diagnostic as its summary, unless
/// `compiler.fail_on_error` is disabled, in which case the failure is
/// logged and the exit code stays 0.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let project_dir = pipeline::resolve_project_root(global)?;
    let config = javelin_config::load_config(&project_dir)?;

    if config.compiler.skip {
        info!("compilation skipped by configuration");
        if !global.quiet {
            eprintln!("    Skipping {} (compiler.skip is set)", config.project.name);
        }
        return Ok(0);
    }

    let aspects = parse_aspects(&config.incremental.aspects, "incremental.aspects")?;
    let module_driven = aspects.is_module_driven();

    if !global.quiet {
        if config.project.version.is_empty() {
            eprintln!("   Compiling {}", config.project.name);
        } else {
            eprintln!(
                "   Compiling {} v{}",
                config.project.name, config.project.version
            );
        }
    }

    let mut dirs = pipeline::source_directories(&config, &project_dir)?;
    let layout = TomlLayout::new(&config, &project_dir);
    let filters = pipeline::scan_filters(&layout)?;
    let files = walk_source_files(&mut dirs, &filters, module_driven)?;

    if !module_driven && files.is_empty() {
        info!("no sources to compile");
        if !global.quiet {
            eprintln!("    Finished (no sources to compile)");
        }
        return Ok(0);
    }
    let scanned = files.len();

    // A forked build honors the configured executable and memory options;
    // otherwise the javac on PATH drives the build.
    let executable = if config.compiler.fork {
        config
            .compiler
            .executable
            .clone()
            .unwrap_or_else(|| "javac".to_string())
    } else {
        "javac".to_string()
    };
    let tool = ForkedJavac::detect(&executable)?;

    let has_module = module_driven || dirs.iter().any(|d| d.descriptor().is_some());
    let mut options = build_standard_options(&config, &tool, has_module);
    if let Some(generated) = layout.generated_sources_directory() {
        fs::create_dir_all(&generated)
            .map_err(|e| format!("failed to create {}: {e}", generated.display()))?;
        options.add_if_non_blank(&tool, "-s", generated.to_str());
    }

    let resolver = FixedResolver::new(pipeline::dependency_paths(&config, &project_dir));
    let resolution = resolver.resolve(Scope::Main, &pipeline::accepted_kinds(has_module))?;
    for warning in &resolution.warnings {
        warn!("{warning}");
    }
    let mut deps = resolution.paths;
    if module_driven {
        deps.insert(
            PathKind::ModuleSourcePath,
            dirs.iter().map(|d| d.root.clone()).collect(),
        );
    }

    let status_dir = pipeline::status_directory(&config, &project_dir);
    if args.force {
        if let Err(e) = fs::remove_dir_all(&status_dir) {
            if e.kind() != ErrorKind::NotFound {
                return Err(format!("failed to clear {}: {e}", status_dir.display()).into());
            }
        }
    }

    let engine = DecisionEngine::new(aspects)
        .with_stale_millis(config.incremental.stale_millis)
        .with_dependency_extensions(config.incremental.dependency_extensions.clone());
    let decision = engine.decide(&dirs, files, &deps, options.option_hash(), &status_dir)?;

    let base_output = pipeline::output_directory(&config, &project_dir);
    let (units, compiled) = match decision {
        Decision::NothingToCompile => {
            info!("outputs are up to date");
            if !global.quiet {
                eprintln!(
                    "    Finished (up to date) in {:.2}s",
                    started.elapsed().as_secs_f64()
                );
            }
            return Ok(0);
        }
        Decision::ModuleDriven { ref modules } => {
            info!(
                modules = modules.len(),
                "delegating change detection to the compiler"
            );
            let module_list = modules.join(",");
            options.add_if_non_blank(&tool, "--module", Some(module_list.as_str()));
            let unit = module_driven_unit(modules, &dirs, &base_output, &deps);
            (vec![unit], 0)
        }
        Decision::Compile { files, cause } => {
            info!(files = files.len(), total = scanned, %cause, "compiling");
            let count = files.len();
            let units = group_by_release_and_module(files, &dirs, &base_output, &deps);
            (units, count)
        }
    };

    let sink = DiagnosticSink::new();
    let mut locations = CommandLineLocations;
    let dump_dir = pipeline::build_directory(&config, &project_dir);
    let executor = Executor::new(&tool, &dump_dir).with_dump_always(args.dump || global.verbose);
    let success = executor.compile(&mut options, &units, &mut locations, &sink)?;

    let renderer = PlainRenderer::new(global.color);
    for diag in &sink.diagnostics() {
        eprintln!("{}", renderer.render(diag));
    }

    if !success || sink.has_errors() {
        let summary = sink
            .first_error()
            .map(|d| d.summary())
            .unwrap_or_else(|| "compiler exited with an error".to_string());
        if config.compiler.fail_on_error {
            return Err(format!("compilation failed: {summary}").into());
        }
        warn!("continuing despite compilation failure (compiler.fail_on_error is false)");
        return Ok(0);
    }

    let elapsed = started.elapsed();
    info!(
        scanned,
        compiled,
        units = units.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "build finished"
    );
    if !global.quiet {
        eprintln!("    Finished in {:.2}s", elapsed.as_secs_f64());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn global_for(temp: &TempDir) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(temp.path().to_string_lossy().into_owned()),
        }
    }

    fn build_args() -> BuildArgs {
        BuildArgs {
            force: false,
            dump: false,
        }
    }

    #[test]
    fn skip_flag_bypasses_the_build() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("javelin.toml"),
            "[project]\nname = \"app\"\n\n[compiler]\nskip = true\n",
        )
        .unwrap();

        let code = run(&build_args(), &global_for(&temp)).unwrap();
        assert_eq!(code, 0);
        assert!(
            !temp.path().join("target").exists(),
            "a skipped build must not touch the build directory"
        );
    }

    #[test]
    fn empty_source_roots_are_a_successful_noop() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("javelin.toml"), "[project]\nname = \"app\"\n").unwrap();

        let code = run(&build_args(), &global_for(&temp)).unwrap();
        assert_eq!(code, 0);
        assert!(
            !temp.path().join("target/javelin-status").exists(),
            "a no-op build must not write a status"
        );
    }

    #[test]
    fn missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(run(&build_args(), &global_for(&temp)).is_err());
    }

    #[test]
    fn invalid_config_combination_fails_before_any_output() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("javelin.toml"),
            "[project]\nname = \"app\"\n\n[compiler]\nrelease = 17\nsource = \"17\"\n",
        )
        .unwrap();

        assert!(run(&build_args(), &global_for(&temp)).is_err());
        assert!(!temp.path().join("target").exists());
    }
}

//! `javelin clean`, removal of build outputs.

use std::fs;
use std::io::ErrorKind;

use tracing::debug;

use crate::pipeline;
use crate::GlobalArgs;

/// Runs the `javelin clean` command.
///
/// Removes the class output directory, the build status directory, and
/// the generated-sources directory. Only these known directories are
/// touched; anything else a user placed under the build directory
/// survives. Missing directories are not an error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = pipeline::resolve_project_root(global)?;
    let config = javelin_config::load_config(&project_dir)?;

    let targets = [
        pipeline::output_directory(&config, &project_dir),
        pipeline::status_directory(&config, &project_dir),
        pipeline::generated_sources_directory(&config, &project_dir),
    ];
    let mut removed = 0usize;
    for dir in &targets {
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "removed");
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(format!("failed to remove {}: {e}", dir.display()).into());
            }
        }
    }

    if !global.quiet {
        match removed {
            0 => eprintln!("     Cleaned (nothing to remove)"),
            1 => eprintln!("     Removed 1 directory"),
            n => eprintln!("     Removed {n} directories"),
        }
    }
    Ok(0)
}

//! Ordered execution of compilation units against a tool.

use crate::descriptor::{patch_descriptor_version, DESCRIPTOR_FIX_RELEASE};
use crate::dump::write_argfile;
use crate::error::InvokeError;
use crate::locations::{LocationFallback, ModuleOptionContext, StandardLocations};
use crate::tool::{CompilerTool, Invocation};
use javelin_common::PathKind;
use javelin_diagnostics::DiagnosticSink;
use javelin_options::Options;
use javelin_partition::SourcesForRelease;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Drives the ordered compilation of partitioned units.
///
/// Units run strictly in partition order and the first failing unit
/// aborts the rest: later releases compile against the base release's
/// classes, so continuing past a failure would only produce follow-on
/// noise. Each unit re-patches the shared option list with its own
/// `--release` value, places its dependency paths, and runs as one or
/// more tasks.
pub struct Executor<'a, T: CompilerTool> {
    tool: &'a T,
    dump_dir: PathBuf,
    dump_always: bool,
    descriptor_first: bool,
}

impl<'a, T: CompilerTool> Executor<'a, T> {
    /// Creates an executor writing argfile dumps into `dump_dir`.
    pub fn new(tool: &'a T, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            dump_dir: dump_dir.into(),
            dump_always: false,
            descriptor_first: false,
        }
    }

    /// Writes the argfile dump before every run instead of only on
    /// failure.
    pub fn with_dump_always(mut self, dump_always: bool) -> Self {
        self.dump_always = dump_always;
        self
    }

    /// Compiles module descriptors in a separate leading task per unit.
    pub fn with_descriptor_first(mut self, descriptor_first: bool) -> Self {
        self.descriptor_first = descriptor_first;
        self
    }

    /// Compiles every unit in order.
    ///
    /// Returns `Ok(true)` when all units succeeded. The first failed unit
    /// writes its argfile dump, logs the equivalent manual command as a
    /// hint, and aborts the remaining units with `Ok(false)`; the tool's
    /// diagnostics are in `sink`. `Err` means the orchestration itself
    /// broke, not that sources failed to compile.
    pub fn compile(
        &self,
        options: &mut Options,
        units: &[SourcesForRelease],
        locations: &mut dyn StandardLocations,
        sink: &DiagnosticSink,
    ) -> Result<bool, InvokeError> {
        for (index, unit) in units.iter().enumerate() {
            if !self.compile_unit(index, unit, options, locations, sink)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compile_unit(
        &self,
        index: usize,
        unit: &SourcesForRelease,
        options: &mut Options,
        locations: &mut dyn StandardLocations,
        sink: &DiagnosticSink,
    ) -> Result<bool, InvokeError> {
        std::fs::create_dir_all(unit.output()).map_err(|source| InvokeError::Io {
            path: unit.output().to_path_buf(),
            source,
        })?;
        if let Some(release) = unit.release() {
            options.set_release(&release.to_string());
        }

        let mut context = ModuleOptionContext::new();
        let mut fallback = LocationFallback::new(locations);
        for (kind, paths) in unit.deps().iter() {
            fallback.place(kind, paths, self.tool)?;
            if let PathKind::PatchModule(module) = kind {
                context.add_module(module.clone());
            }
        }
        let placed = fallback.finish();

        for (task_index, task) in unit.tasks(self.descriptor_first).iter().enumerate() {
            let mut entries = options.entries().to_vec();
            entries.extend(placed.iter().cloned());
            context.append_to(&mut entries);
            let invocation = Invocation {
                options: entries,
                files: task.files.iter().map(|f| f.path.clone()).collect(),
                output: unit.output().to_path_buf(),
            };
            let dump = self.dump_path(index, task_index);
            if self.dump_always {
                write_argfile(&dump, &invocation)?;
            }
            debug!(
                unit = index,
                task = task_index,
                files = invocation.files.len(),
                "running {}",
                self.tool.name()
            );
            if !self.tool.run(&invocation, sink)? || sink.has_errors() {
                write_argfile(&dump, &invocation)?;
                error!(
                    "compilation failed; to reproduce, run: {} @{}",
                    self.tool.name(),
                    dump.display()
                );
                return Ok(false);
            }
        }

        self.patch_descriptors(unit)?;
        info!(
            unit = index,
            release = ?unit.release(),
            files = unit.file_count(),
            "unit compiled"
        );
        Ok(true)
    }

    /// Corrects the class-file version of the descriptors a successful
    /// unit just produced. Tools at or past the fix release write the
    /// right version themselves.
    fn patch_descriptors(&self, unit: &SourcesForRelease) -> Result<(), InvokeError> {
        let Some(release) = unit.release() else {
            return Ok(());
        };
        if self.tool.release().feature() >= DESCRIPTOR_FIX_RELEASE {
            return Ok(());
        }
        let mut candidates = vec![unit.output().join("module-info.class")];
        for module in unit.module_names() {
            candidates.push(unit.output().join(module).join("module-info.class"));
        }
        for path in candidates {
            patch_descriptor_version(&path, release)?;
        }
        Ok(())
    }

    fn dump_path(&self, unit: usize, task: usize) -> PathBuf {
        if unit == 0 && task == 0 {
            self.dump_dir.join("javac.args")
        } else {
            self.dump_dir.join(format!("javac-{unit}-{task}.args"))
        }
    }
}

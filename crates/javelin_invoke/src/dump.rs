//! Plain-text argfile rendering of tool invocations.

use crate::error::InvokeError;
use crate::tool::Invocation;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders an invocation in `javac @file` argfile syntax.
///
/// One option or value per line; entries containing spaces are
/// double-quoted with embedded backslashes and quotes escaped. The output
/// directory travels as an explicit `-d` pair so the rendered file is a
/// complete, reproducible invocation on its own.
pub fn render_argfile(invocation: &Invocation) -> String {
    let mut text = String::new();
    for entry in &invocation.options {
        push_entry(&mut text, entry);
    }
    push_entry(&mut text, "-d");
    push_entry(&mut text, &invocation.output.to_string_lossy());
    for file in &invocation.files {
        push_entry(&mut text, &file.to_string_lossy());
    }
    text
}

/// Writes the argfile for an invocation to `path`, creating parent
/// directories as needed.
///
/// Written up front when debug dumping is enabled and always on
/// compilation failure, where the failure hint names it; the forked tool
/// passes the same format to the real `javac`.
pub fn write_argfile(path: &Path, invocation: &Invocation) -> Result<(), InvokeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| InvokeError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, render_argfile(invocation)).map_err(|source| InvokeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn push_entry(out: &mut String, entry: &str) {
    if entry.contains(' ') {
        let escaped = entry.replace('\\', "\\\\").replace('"', "\\\"");
        let _ = writeln!(out, "\"{escaped}\"");
    } else {
        let _ = writeln!(out, "{entry}");
    }
}

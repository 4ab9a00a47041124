//! In-place version correction of compiled module descriptors.

use crate::error::InvokeError;
use javelin_common::Release;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// First compiler release that writes the targeted version into the
/// descriptor itself, making the patch unnecessary.
pub const DESCRIPTOR_FIX_RELEASE: u16 = 22;

/// Rewrites the class-file major version of a compiled
/// `module-info.class` to match the unit's target release.
///
/// Compilers below release [`DESCRIPTOR_FIX_RELEASE`] emit the descriptor
/// of a `--release`-targeted unit with their own default major version; in
/// a multi-release layout the versioned descriptor then contradicts the
/// directory it sits in. The major version is two big-endian bytes at
/// offset 6, after the magic number and the minor version.
///
/// Returns `Ok(false)` when no descriptor exists at `path`, the normal
/// case for unnamed-module units. An I/O failure or a file that is not a
/// class file is fatal; shipping a wrong descriptor silently would be
/// worse than failing the build.
pub fn patch_descriptor_version(path: &Path, release: Release) -> Result<bool, InvokeError> {
    let mut bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(InvokeError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if bytes.len() < 8 || bytes[..4] != CLASS_MAGIC {
        return Err(InvokeError::DescriptorFormat {
            path: path.to_path_buf(),
        });
    }
    bytes[6..8].copy_from_slice(&release.class_file_major().to_be_bytes());
    std::fs::write(path, &bytes).map_err(|source| InvokeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        major = release.class_file_major(),
        "patched module descriptor version"
    );
    Ok(true)
}

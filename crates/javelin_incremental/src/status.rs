//! Persisted record of what the previous build saw.

use crate::error::IncrementalError;
use javelin_common::OptionHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Format version written into every status file.
pub const STATUS_VERSION: u32 = 1;

/// Name of the status file within the status directory.
const STATUS_FILE: &str = "status.json";

/// The persisted build status.
///
/// Stored as implementation-private JSON in a status directory outside the
/// class-output tree (conventionally `<build dir>/javelin-status/`). The
/// record is safe for a user to delete at any time; the next build then
/// behaves as a first build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildStatus {
    /// Format version; a mismatch invalidates the record.
    pub version: u32,
    /// Absolute paths of every source the previous build scanned.
    pub sources: BTreeSet<PathBuf>,
    /// Hash of the previous build's finalized option list.
    pub option_hash: OptionHash,
    /// Output files the previous build created, when recorded.
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
}

impl BuildStatus {
    /// Creates a status record for the current scan.
    pub fn new(sources: BTreeSet<PathBuf>, option_hash: OptionHash) -> Self {
        Self {
            version: STATUS_VERSION,
            sources,
            option_hash,
            outputs: Vec::new(),
        }
    }

    /// Loads the status record from `status_dir`.
    ///
    /// A missing file is the first build and yields `Ok(None)`. Unreadable
    /// content or an unknown format version also yields `Ok(None)` after a
    /// warning; a stale full rebuild is always safe, a wrong incremental
    /// answer is not. Any other I/O failure is fatal.
    pub fn load(status_dir: &Path) -> Result<Option<Self>, IncrementalError> {
        let path = status_dir.join(STATUS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(IncrementalError::StatusIo { path, source }),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(status) if status.version == STATUS_VERSION => Ok(Some(status)),
            Ok(status) => {
                warn!(
                    version = status.version,
                    "build status has unknown format version, forcing full rebuild"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "build status is unreadable, forcing full rebuild");
                Ok(None)
            }
        }
    }

    /// Saves the status record into `status_dir`, creating the directory
    /// if needed.
    pub fn save(&self, status_dir: &Path) -> Result<(), IncrementalError> {
        std::fs::create_dir_all(status_dir).map_err(|source| IncrementalError::StatusIo {
            path: status_dir.to_path_buf(),
            source,
        })?;
        let path = status_dir.join(STATUS_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| IncrementalError::StatusEncode {
                reason: e.to_string(),
            })?;
        std::fs::write(&path, json).map_err(|source| IncrementalError::StatusIo { path, source })
    }
}

//! Incremental-compilation aspects and their descriptor parser.

use crate::error::ConfigError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The set of change detections the incremental engine performs.
    ///
    /// Parsed once from the `incremental.aspects` descriptor string and
    /// queried by the decision engine. Each bit enables one check or
    /// modifies how a check escalates.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
    pub struct Aspects: u8 {
        /// Detect added and removed source files.
        const SOURCES = 1 << 0;
        /// Detect source files newer than their class files.
        const CLASSES = 1 << 1;
        /// Detect dependency path entries modified since the last build.
        const DEPENDENCIES = 1 << 2;
        /// Detect changes to the effective compiler options.
        const OPTIONS = 1 << 3;
        /// Escalate an added source file to a full rebuild.
        const REBUILD_ON_ADD = 1 << 4;
        /// Escalate any stale source file to a full rebuild.
        const REBUILD_ON_CHANGE = 1 << 5;
        /// Delegate change detection to the compiler via `--module`.
        const MODULES = 1 << 6;
    }
}

impl Aspects {
    /// The default aspect set when no descriptor is given.
    pub const DEFAULTS: Self = Self::from_bits_truncate(
        Self::SOURCES.bits()
            | Self::CLASSES.bits()
            | Self::DEPENDENCIES.bits()
            | Self::OPTIONS.bits(),
    );

    /// Returns `true` if change detection is delegated to the compiler.
    #[inline]
    pub const fn is_module_driven(self) -> bool {
        self.contains(Self::MODULES)
    }
}

impl Default for Aspects {
    fn default() -> Self {
        Self::DEFAULTS
    }
}

/// Parses a comma-separated aspect descriptor into an [`Aspects`] set.
///
/// Tokens are case-insensitive and accept `_` in place of `-`. Recognized
/// tokens: `sources`, `classes`, `dependencies`, `options`,
/// `rebuild-on-add` (alias `additions`), `rebuild-on-change`, `modules`,
/// `none`, `all`, and `defaults`. A blank descriptor yields
/// [`Aspects::DEFAULTS`]. An unknown token is a configuration error naming
/// `parameter`.
pub fn parse_aspects(descriptor: &str, parameter: &str) -> Result<Aspects, ConfigError> {
    if descriptor.trim().is_empty() {
        return Ok(Aspects::DEFAULTS);
    }
    let mut aspects = Aspects::empty();
    for token in descriptor.split(',') {
        let normalized = token.trim().to_ascii_lowercase().replace('_', "-");
        let bits = match normalized.as_str() {
            "" => continue,
            "none" => Aspects::empty(),
            "all" => Aspects::all(),
            "defaults" => Aspects::DEFAULTS,
            "sources" => Aspects::SOURCES,
            "classes" => Aspects::CLASSES,
            "dependencies" => Aspects::DEPENDENCIES,
            "options" => Aspects::OPTIONS,
            "rebuild-on-add" | "additions" => Aspects::REBUILD_ON_ADD,
            "rebuild-on-change" => Aspects::REBUILD_ON_CHANGE,
            "modules" => Aspects::MODULES,
            _ => {
                return Err(ConfigError::InvalidAspect {
                    parameter: parameter.to_string(),
                    token: token.trim().to_string(),
                })
            }
        };
        aspects |= bits;
    }
    Ok(aspects)
}

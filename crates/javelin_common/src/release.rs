//! Java release versions with parsing and class-file mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Java release (feature) version such as 8, 11, or 17.
///
/// Supports parsing from both the modern form (`"17"`) and the legacy
/// `1.x` form (`"1.8"` parses as 8). Ordered numerically, so release 9
/// sorts before release 11. Used to tag source directories, order
/// multi-release compilation units, and derive class-file versions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Release(u16);

impl Release {
    /// Creates a release from a feature number.
    pub fn new(feature: u16) -> Self {
        Self(feature)
    }

    /// Returns the feature number (e.g. 17).
    pub fn feature(&self) -> u16 {
        self.0
    }

    /// Returns the class-file major version for this release.
    ///
    /// The class-file format numbers majors from 45 (JDK 1.1), so a
    /// release `n` maps to major `n + 44` (release 17 → major 61).
    pub fn class_file_major(&self) -> u16 {
        self.0 + 44
    }
}

impl fmt::Debug for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Release({})", self.0)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing release version strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid release version: '{input}'")]
pub struct ParseReleaseError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Release {
    type Err = ParseReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseReleaseError {
            input: s.to_string(),
        };

        // Legacy "1.x" form used up to Java 8 (e.g. "1.8" means 8)
        let normalized = s.strip_prefix("1.").unwrap_or(s);
        let feature: u16 = normalized.parse().map_err(|_| err())?;
        if feature == 0 {
            return Err(err());
        }
        Ok(Release(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modern_form() {
        let r: Release = "17".parse().unwrap();
        assert_eq!(r.feature(), 17);
    }

    #[test]
    fn parse_legacy_form() {
        let r: Release = "1.8".parse().unwrap();
        assert_eq!(r.feature(), 8);
    }

    #[test]
    fn parse_trims_whitespace() {
        let r: Release = "  11  ".parse().unwrap();
        assert_eq!(r.feature(), 11);
    }

    #[test]
    fn parse_invalid() {
        assert!("banana".parse::<Release>().is_err());
        assert!("".parse::<Release>().is_err());
        assert!("-5".parse::<Release>().is_err());
    }

    #[test]
    fn parse_zero_rejected() {
        let err = "0".parse::<Release>().unwrap_err();
        assert_eq!(err.input, "0");
    }

    #[test]
    fn ordering_is_numeric() {
        let nine: Release = "9".parse().unwrap();
        let eleven: Release = "11".parse().unwrap();
        assert!(nine < eleven);
    }

    #[test]
    fn class_file_major_mapping() {
        assert_eq!(Release::new(8).class_file_major(), 52);
        assert_eq!(Release::new(17).class_file_major(), 61);
        assert_eq!(Release::new(21).class_file_major(), 65);
    }

    #[test]
    fn display_plain_number() {
        assert_eq!(format!("{}", Release::new(17)), "17");
    }

    #[test]
    fn parse_error_display() {
        let err = "x".parse::<Release>().unwrap_err();
        assert_eq!(format!("{err}"), "invalid release version: 'x'");
    }

    #[test]
    fn serde_roundtrip() {
        let r = Release::new(21);
        let json = serde_json::to_string(&r).unwrap();
        let back: Release = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}

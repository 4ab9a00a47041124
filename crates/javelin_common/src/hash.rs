//! Option-list hashing for change detection between builds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 hash over a finalized compiler option list.
///
/// Two builds whose option lists produce the same `OptionHash` are assumed
/// to have been configured identically, and an unchanged hash suppresses
/// the option-triggered full rebuild. This is best-effort by design: a
/// hash collision makes an option change go undetected, which is an
/// accepted limitation rather than something to paper over with a
/// stronger mechanism.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionHash([u8; 16]);

impl OptionHash {
    /// Computes the hash of an ordered sequence of option entries.
    ///
    /// Each entry is mixed in with a length prefix so that entry
    /// boundaries cannot alias (`["-a", "bc"]` and `["-ab", "c"]` hash
    /// differently).
    pub fn of_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut buf = Vec::new();
        for entry in entries {
            buf.extend_from_slice(&(entry.len() as u64).to_le_bytes());
            buf.extend_from_slice(entry.as_bytes());
        }
        let hash = xxhash_rust::xxh3::xxh3_128(&buf);
        Self(hash.to_le_bytes())
    }
}

impl fmt::Display for OptionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for OptionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = OptionHash::of_entries(["-g", "-parameters"]);
        let b = OptionHash::of_entries(["-g", "-parameters"]);
        assert_eq!(a, b);
    }

    #[test]
    fn order_matters() {
        let a = OptionHash::of_entries(["-g", "-parameters"]);
        let b = OptionHash::of_entries(["-parameters", "-g"]);
        assert_ne!(a, b);
    }

    #[test]
    fn entry_boundaries_do_not_alias() {
        let a = OptionHash::of_entries(["-a", "bc"]);
        let b = OptionHash::of_entries(["-ab", "c"]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_list_hashes() {
        let a = OptionHash::of_entries([]);
        let b = OptionHash::of_entries([]);
        assert_eq!(a, b);
        assert_ne!(a, OptionHash::of_entries(["-g"]));
    }

    #[test]
    fn display_format() {
        let h = OptionHash::of_entries(["-encoding", "UTF-8"]);
        let s = format!("{h}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = OptionHash::of_entries(["-g"]);
        let s = format!("{h:?}");
        assert!(s.starts_with("OptionHash("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = OptionHash::of_entries(["--release", "17"]);
        let json = serde_json::to_string(&h).unwrap();
        let back: OptionHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}

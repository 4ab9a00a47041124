//! The ordered compiler option list and its guarded append operations.

use crate::checker::OptionChecker;
use javelin_common::OptionHash;
use tracing::warn;

/// An ordered compiler option list under construction.
///
/// Appends are guarded by an [`OptionChecker`]: an option the tool does not
/// accept is omitted and produces exactly one warning, recorded here and
/// logged at warn level. No rejection is ever fatal. The finalized list is
/// hashed for the incremental engine's option-change check.
#[derive(Debug, Default)]
pub struct Options {
    entries: Vec<String>,
    warnings: Vec<String>,
}

impl Options {
    /// Creates an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the no-argument flag `option` when `condition` holds and the
    /// tool accepts it with zero arguments.
    ///
    /// A false condition appends nothing and warns about nothing; a true
    /// condition with an unsupported option warns once and omits it.
    pub fn add_if_true(&mut self, checker: &dyn OptionChecker, option: &str, condition: bool) {
        if !condition {
            return;
        }
        if checker.accepted_arity(option) == Some(0) {
            self.entries.push(option.to_string());
        } else {
            self.reject(format!("unsupported option '{option}', skipped"));
        }
    }

    /// Appends `option value` when `value` is non-blank and the tool
    /// accepts the option with exactly one argument.
    pub fn add_if_non_blank(
        &mut self,
        checker: &dyn OptionChecker,
        option: &str,
        value: Option<&str>,
    ) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        if checker.accepted_arity(option) == Some(1) {
            self.entries.push(option.to_string());
            self.entries.push(value.to_string());
        } else {
            self.reject(format!("unsupported option '{option}', skipped"));
        }
    }

    /// Appends the self-contained form `option:v1,v2,...` built from a
    /// comma-separated value list.
    ///
    /// Values are trimmed, lowercased, and empties dropped; `filter` may
    /// then transform the list (an empty result appends the bare flag with
    /// no sub-values). When the tool rejects the synthetic option and a
    /// non-empty `valid` set was supplied, the warning names the first
    /// sub-value outside that set.
    pub fn add_comma_separated(
        &mut self,
        checker: &dyn OptionChecker,
        option: &str,
        csv: &str,
        valid: &[&str],
        filter: Option<&dyn Fn(Vec<String>) -> Vec<String>>,
    ) {
        let mut values: Vec<String> = csv
            .split(',')
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        if let Some(filter) = filter {
            values = filter(values);
        }
        let synthetic = if values.is_empty() {
            option.to_string()
        } else {
            format!("{option}:{}", values.join(","))
        };
        if checker.accepted_arity(&synthetic) == Some(0) {
            self.entries.push(synthetic);
            return;
        }
        let invalid = if valid.is_empty() {
            None
        } else {
            values.iter().find(|v| !valid.contains(&v.as_str()))
        };
        match invalid {
            Some(sub) => self.reject(format!(
                "unsupported option '{synthetic}' (invalid sub-value '{sub}'), skipped"
            )),
            None => self.reject(format!("unsupported option '{synthetic}', skipped")),
        }
    }

    /// Sets the `--release` value, replacing an existing one in place.
    ///
    /// Multi-release builds patch the same option list with a different
    /// release before each unit, so a second call must not append a
    /// duplicate option.
    pub fn set_release(&mut self, value: &str) {
        if let Some(pos) = self.entries.iter().position(|e| e == "--release") {
            if pos + 1 < self.entries.len() {
                self.entries[pos + 1] = value.to_string();
            } else {
                self.entries.push(value.to_string());
            }
        } else {
            self.entries.push("--release".to_string());
            self.entries.push(value.to_string());
        }
    }

    /// Appends a runtime memory option such as `-J-Xmx1024M`.
    ///
    /// The value is digits with an optional `K`/`M`/`G` suffix, accepted in
    /// either case and canonicalized to uppercase. With `add_default_unit`
    /// a missing suffix gets `M` appended along with a warning. A malformed
    /// value warns once and the option is omitted. Runtime options go to
    /// the forked process, not the tool, so no capability check applies.
    pub fn add_memory_value(
        &mut self,
        option: &str,
        label: &str,
        value: &str,
        add_default_unit: bool,
    ) {
        match canonical_memory(value) {
            Some((mut canonical, had_unit)) => {
                if !had_unit && add_default_unit {
                    canonical.push('M');
                    self.reject(format!(
                        "no unit given for {label} '{value}', assuming megabytes"
                    ));
                }
                self.entries.push(format!("{option}{canonical}"));
            }
            None => self.reject(format!("invalid {label} '{value}', option {option} skipped")),
        }
    }

    /// Appends a value verbatim with no capability check.
    pub fn add_raw(&mut self, value: impl Into<String>) {
        self.entries.push(value.into());
    }

    /// The option list built so far.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Consumes the builder, returning the option list.
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    /// Warnings produced so far, one per rejected or adjusted option.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Hash of the current option list for change detection.
    pub fn option_hash(&self) -> OptionHash {
        OptionHash::of_entries(self.entries.iter().map(String::as_str))
    }

    /// Returns `true` if no options have been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reject(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Splits a memory value into canonical form, reporting whether a unit
/// suffix was present. `None` means the value is malformed.
fn canonical_memory(value: &str) -> Option<(String, bool)> {
    let v = value.trim();
    let last = v.chars().last()?;
    if last.is_ascii_alphabetic() {
        let digits = &v[..v.len() - 1];
        let unit = last.to_ascii_uppercase();
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || !matches!(unit, 'K' | 'M' | 'G')
        {
            return None;
        }
        Some((format!("{digits}{unit}"), true))
    } else if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) {
        Some((v.to_string(), false))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::StandardChecker;

    /// A tool that supports nothing.
    struct NoSupport;

    impl OptionChecker for NoSupport {
        fn accepted_arity(&self, _option: &str) -> Option<u8> {
            None
        }
    }

    // -- add_if_true tests --

    #[test]
    fn add_if_true_appends_accepted_flag() {
        let mut opts = Options::new();
        opts.add_if_true(&StandardChecker, "-nowarn", true);
        assert_eq!(opts.entries(), ["-nowarn"]);
        assert!(opts.warnings().is_empty());
    }

    #[test]
    fn add_if_true_false_condition_is_silent() {
        let mut opts = Options::new();
        opts.add_if_true(&NoSupport, "-nowarn", false);
        assert!(opts.is_empty());
        assert!(opts.warnings().is_empty());
    }

    #[test]
    fn rejected_flag_warns_once_and_is_omitted() {
        let mut opts = Options::new();
        opts.add_if_true(&NoSupport, "-parameters", true);
        assert!(opts.is_empty());
        assert_eq!(opts.warnings().len(), 1);
        assert!(opts.warnings()[0].contains("-parameters"));
    }

    // -- add_if_non_blank tests --

    #[test]
    fn add_if_non_blank_appends_pair() {
        let mut opts = Options::new();
        opts.add_if_non_blank(&StandardChecker, "-encoding", Some("UTF-8"));
        assert_eq!(opts.entries(), ["-encoding", "UTF-8"]);
    }

    #[test]
    fn add_if_non_blank_skips_blank_silently() {
        let mut opts = Options::new();
        opts.add_if_non_blank(&StandardChecker, "-encoding", None);
        opts.add_if_non_blank(&StandardChecker, "-encoding", Some("   "));
        assert!(opts.is_empty());
        assert!(opts.warnings().is_empty());
    }

    #[test]
    fn add_if_non_blank_rejection_warns() {
        let mut opts = Options::new();
        opts.add_if_non_blank(&NoSupport, "-encoding", Some("UTF-8"));
        assert!(opts.is_empty());
        assert_eq!(opts.warnings().len(), 1);
    }

    // -- add_comma_separated tests --

    #[test]
    fn comma_separated_normalizes_values() {
        let mut opts = Options::new();
        opts.add_comma_separated(
            &StandardChecker,
            "-Xlint",
            " Unchecked , ,DEPRECATION ",
            &[],
            None,
        );
        assert_eq!(opts.entries(), ["-Xlint:unchecked,deprecation"]);
    }

    #[test]
    fn comma_separated_all_collapses_to_bare_flag() {
        let collapse = |values: Vec<String>| {
            if values.iter().any(|v| v == "all") {
                Vec::new()
            } else {
                values
            }
        };
        let mut opts = Options::new();
        opts.add_comma_separated(&StandardChecker, "-Xlint", "all", &[], Some(&collapse));
        assert_eq!(opts.entries(), ["-Xlint"]);
    }

    #[test]
    fn comma_separated_rejection_names_invalid_sub_value() {
        let mut opts = Options::new();
        opts.add_comma_separated(
            &NoSupport,
            "-Xlint",
            "unchecked,bogus",
            &["unchecked", "deprecation"],
            None,
        );
        assert!(opts.is_empty());
        assert_eq!(opts.warnings().len(), 1);
        assert!(opts.warnings()[0].contains("'bogus'"));
    }

    #[test]
    fn comma_separated_rejection_without_valid_set_is_generic() {
        let mut opts = Options::new();
        opts.add_comma_separated(&NoSupport, "-Xlint", "unchecked", &[], None);
        assert_eq!(opts.warnings().len(), 1);
        assert!(opts.warnings()[0].contains("-Xlint:unchecked"));
        assert!(!opts.warnings()[0].contains("sub-value"));
    }

    // -- set_release tests --

    #[test]
    fn set_release_appends_then_replaces_in_place() {
        let mut opts = Options::new();
        opts.add_raw("-nowarn");
        opts.set_release("11");
        assert_eq!(opts.entries(), ["-nowarn", "--release", "11"]);
        opts.set_release("17");
        assert_eq!(opts.entries(), ["-nowarn", "--release", "17"]);
    }

    // -- add_memory_value tests --

    #[test]
    fn memory_unit_canonicalized_to_uppercase() {
        let mut opts = Options::new();
        opts.add_memory_value("-J-Xms", "initial heap size", "512m", true);
        assert_eq!(opts.entries(), ["-J-Xms512M"]);
        assert!(opts.warnings().is_empty());
    }

    #[test]
    fn memory_default_unit_added_with_warning() {
        let mut opts = Options::new();
        opts.add_memory_value("-J-Xmx", "maximum heap size", "1024", true);
        assert_eq!(opts.entries(), ["-J-Xmx1024M"]);
        assert_eq!(opts.warnings().len(), 1);
        assert!(opts.warnings()[0].contains("assuming megabytes"));
    }

    #[test]
    fn memory_plain_number_kept_without_default_unit() {
        let mut opts = Options::new();
        opts.add_memory_value("-J-Xmx", "maximum heap size", "1024", false);
        assert_eq!(opts.entries(), ["-J-Xmx1024"]);
        assert!(opts.warnings().is_empty());
    }

    #[test]
    fn malformed_memory_warns_and_omits() {
        let mut opts = Options::new();
        for bad in ["lots", "12q", "G", ""] {
            opts.add_memory_value("-J-Xmx", "maximum heap size", bad, true);
        }
        assert!(opts.is_empty());
        assert_eq!(opts.warnings().len(), 4);
    }

    // -- hash tests --

    #[test]
    fn option_hash_tracks_entries() {
        let mut a = Options::new();
        a.add_raw("-nowarn");
        let before = a.option_hash();
        a.set_release("17");
        assert_ne!(before, a.option_hash());

        let mut b = Options::new();
        b.add_raw("-nowarn");
        b.set_release("17");
        assert_eq!(a.option_hash(), b.option_hash());
    }
}

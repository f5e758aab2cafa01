//! SLS name normalization.
//!
//! The boundary files and the survey spreadsheet spell the same unit
//! differently: `RT 009 LINGKUNGAN GATEP`, `RT 09 LINGKUNGAN GATEP` and
//! `rt 9 lingkungan gatep` all name one SLS. [`normalize`] maps every spelling
//! to the zero-padded form, and is the only notion of name equality used
//! anywhere in the crate.

use regex::Regex;
use std::sync::LazyLock;

/// `RT`, the unit number, then an optional free-text remainder.
static RT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^RT\s+([0-9]+)(?:\s+(.*))?$").expect("RT name pattern is valid")
});

/// Minimum width of the unit number
const RT_WIDTH: usize = 3;

/// Canonicalize an administrative unit name.
///
/// Uppercases and trims, then rewrites `RT <digits> <rest>` as
/// `RT NNN <rest>` with the number zero-padded to three digits. Numbers wider
/// than three digits are kept whole. Anything else comes back uppercased and
/// trimmed. Pure and idempotent.
pub fn normalize(name: &str) -> String {
    let name = name.to_uppercase();
    let name = name.trim();

    let Some(caps) = RT_NAME.captures(name) else {
        return name.to_string();
    };

    let digits = caps[1].trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");

    if rest.is_empty() {
        format!("RT {:0>width$}", digits, width = RT_WIDTH)
    } else {
        format!("RT {:0>width$} {}", digits, rest, width = RT_WIDTH)
    }
}

/// Normalize a JSON property value; anything but a string yields `""`.
pub fn normalize_value(value: &serde_json::Value) -> String {
    value.as_str().map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_equivalence() {
        let expected = "RT 009 LINGKUNGAN GATEP";
        assert_eq!(normalize("RT 9 LINGKUNGAN GATEP"), expected);
        assert_eq!(normalize("RT 09 LINGKUNGAN GATEP"), expected);
        assert_eq!(normalize("RT 009 LINGKUNGAN GATEP"), expected);
        assert_eq!(normalize("  rt 9 lingkungan gatep  "), expected);
    }

    #[test]
    fn test_fallback_is_uppercase_trim() {
        assert_eq!(normalize("SOME OTHER NAME"), "SOME OTHER NAME");
        assert_eq!(normalize("  pagesangan timur "), "PAGESANGAN TIMUR");
        // RT must lead the name
        assert_eq!(normalize("DUSUN RT 5 X"), "DUSUN RT 5 X");
        // digits must be separated from the remainder
        assert_eq!(normalize("RT 9A GATEP"), "RT 9A GATEP");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_wide_numbers_are_not_truncated() {
        assert_eq!(normalize("RT 1234 KEKALIK"), "RT 1234 KEKALIK");
        assert_eq!(normalize("RT 0001234 KEKALIK"), "RT 1234 KEKALIK");
        assert_eq!(
            normalize("RT 123456789012345678901234567890 X"),
            "RT 123456789012345678901234567890 X"
        );
        assert_eq!(normalize("RT 000 X"), "RT 000 X");
    }

    #[test]
    fn test_remainder_kept_verbatim() {
        assert_eq!(
            normalize("RT 3   LINGKUNGAN  PONDOK PRASI "),
            "RT 003 LINGKUNGAN  PONDOK PRASI"
        );
    }

    #[test]
    fn test_multiline_remainder() {
        let expected = "RT 001 LINGKUNGAN GATEP\nBLOK A";
        assert_eq!(normalize("RT 1 LINGKUNGAN GATEP\nBLOK A"), expected);
        assert_eq!(normalize("rt 001 lingkungan gatep\nblok a"), expected);
        assert_eq!(normalize("RT 1\nLINGKUNGAN GATEP\r\nBLOK A"), "RT 001 LINGKUNGAN GATEP\r\nBLOK A");
    }

    #[test]
    fn test_number_without_remainder() {
        assert_eq!(normalize("rt 7"), "RT 007");
        assert_eq!(normalize("RT 7 "), "RT 007");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "RT 9 LINGKUNGAN GATEP",
            "rt   12\tkebon roek",
            "RT 7",
            "RT 0",
            "RT 99999 X",
            "SOME OTHER NAME",
            "straße",
            "",
            "  RT",
            "RT 1 RT 2 NESTED",
            "RT 4 GATEP\nBLOK B",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(
            normalize_value(&serde_json::json!("rt 1 ampenan")),
            "RT 001 AMPENAN"
        );
        assert_eq!(normalize_value(&serde_json::json!(12)), "");
        assert_eq!(normalize_value(&serde_json::Value::Null), "");
    }
}

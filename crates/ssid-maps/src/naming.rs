//! Artifact file names.

use chrono::{DateTime, Utc};

/// Longest SSID fragment kept in a file name.
pub const MAX_NAME_SSID_CHARS: usize = 48;

pub(crate) const NAME_PREFIX: &str = "WiFiGeoMap";
pub(crate) const SUMMARY_LABEL: &str = "Summary";

/// Reduce an SSID to a file-name-safe fragment.
///
/// ASCII alphanumerics, `-` and `_` are kept; every other run of characters
/// becomes a single `_`. Leading and trailing `_` are trimmed, the result is
/// capped at [`MAX_NAME_SSID_CHARS`], and an empty result becomes `ssid`.
#[must_use]
pub fn sanitize_ssid(ssid: &str) -> String {
    let mut out = String::with_capacity(ssid.len());
    let mut pending_gap = false;
    for c in ssid.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if pending_gap && !out.is_empty() {
                out.push('_');
            }
            pending_gap = false;
            out.push(c);
        } else {
            pending_gap = true;
        }
    }

    let trimmed: String = out
        .trim_matches('_')
        .chars()
        .take(MAX_NAME_SSID_CHARS)
        .collect();
    let trimmed = trimmed.trim_end_matches('_');
    if trimmed.is_empty() {
        String::from("ssid")
    } else {
        trimmed.to_string()
    }
}

/// `WiFiGeoMap_{label}_{%Y%m%d_%H%M%S}` without extension or suffix.
pub(crate) fn stem(label: &str, at: DateTime<Utc>) -> String {
    format!("{NAME_PREFIX}_{label}_{}", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("HomeNet42", "HomeNet42")]
    #[case("FreeWiFi_123", "FreeWiFi_123")]
    #[case("Café Wi-Fi", "Caf_Wi-Fi")]
    #[case("  spaces  everywhere ", "spaces_everywhere")]
    #[case("a/b\\c:d", "a_b_c_d")]
    #[case("../../etc/passwd", "etc_passwd")]
    #[case("!!!", "ssid")]
    #[case("", "ssid")]
    #[case("__x__", "x")]
    #[case("日本語ネット", "ssid")]
    fn sanitizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_ssid(input), expected);
    }

    #[test]
    fn caps_length() {
        let long = "A".repeat(100);
        assert_eq!(sanitize_ssid(&long).len(), MAX_NAME_SSID_CHARS);
    }

    #[test]
    fn stem_format() {
        let at = DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(stem("HomeNet42", at), "WiFiGeoMap_HomeNet42_20250102_030405");
    }
}

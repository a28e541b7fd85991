//! Ordered SSID validation rule set.
//!
//! Rules are evaluated in a fixed order and never short-circuit, so a single
//! verdict reports every violated rule:
//!
//! 1. empty or whitespace-only (`empty`)
//! 2. length bounds (`too_short`, `too_long`) and pure punctuation (`no_alphanumeric`)
//! 3. placeholder policy table, then repeated characters (`repeated_character`)
//! 4. only control / non-printable characters (`non_printable`)
//! 5. lossy decode markers (`invalid_encoding`)
//!
//! Accepted SSIDs are normalized (trim + lowercase) for use as the cache key;
//! the original spelling stays on the verdict for display.

use regex::Regex;

use crate::entities::{ProbeRecord, SsidVerdict};
use crate::errors::CoreError;

/// Stable rejection reason codes.
pub mod reasons {
    pub const EMPTY: &str = "empty";
    pub const TOO_SHORT: &str = "too_short";
    pub const TOO_LONG: &str = "too_long";
    pub const NO_ALPHANUMERIC: &str = "no_alphanumeric";
    pub const REPEATED_CHARACTER: &str = "repeated_character";
    pub const NON_PRINTABLE: &str = "non_printable";
    pub const INVALID_ENCODING: &str = "invalid_encoding";
}

/// Maximum SSID length in octets per IEEE 802.11.
pub const MAX_SSID_BYTES: usize = 32;

/// Built-in placeholder policy table as `(reason, pattern)` pairs.
pub const DEFAULT_PLACEHOLDERS: &[(&str, &str)] = &[
    ("placeholder_zeros", r"^0000"),
    ("wildcard", r"(?i)^wildcard"),
    ("vendor_default", r"(?i)^(linksys|netgear|dlink|admin|setup|test)"),
    ("vendor_default", r"(?i)\bdefault\b"),
    ("hex_noise", r"^[0-9A-Fa-f]{12,}$"),
    ("hex_noise", r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$"),
];

/// Trim and case-fold an SSID into its cache key.
#[must_use]
pub fn normalize_ssid(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One entry of the placeholder policy table.
#[derive(Debug, Clone)]
pub struct PlaceholderRule {
    reason: String,
    pattern: Regex,
}

impl PlaceholderRule {
    /// Compile a policy entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn new(reason: impl Into<String>, pattern: &str) -> Result<Self, CoreError> {
        let reason = reason.into();
        let pattern = Regex::new(pattern).map_err(|source| CoreError::InvalidPattern {
            reason: reason.clone(),
            source,
        })?;
        Ok(Self { reason, pattern })
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn matches(&self, ssid: &str) -> bool {
        self.pattern.is_match(ssid)
    }
}

/// Pure, configurable SSID classifier.
#[derive(Debug, Clone)]
pub struct SsidValidator {
    min_length: usize,
    max_bytes: usize,
    reject_repeated_characters: bool,
    placeholders: Vec<PlaceholderRule>,
}

impl Default for SsidValidator {
    fn default() -> Self {
        let placeholders = DEFAULT_PLACEHOLDERS
            .iter()
            .map(|(reason, pattern)| {
                PlaceholderRule::new(*reason, pattern)
                    .expect("built-in placeholder pattern compiles")
            })
            .collect();
        Self::new(2, MAX_SSID_BYTES, true, placeholders)
    }
}

impl SsidValidator {
    #[must_use]
    pub const fn new(
        min_length: usize,
        max_bytes: usize,
        reject_repeated_characters: bool,
        placeholders: Vec<PlaceholderRule>,
    ) -> Self {
        Self {
            min_length,
            max_bytes,
            reject_repeated_characters,
            placeholders,
        }
    }

    #[must_use]
    pub fn placeholders(&self) -> &[PlaceholderRule] {
        &self.placeholders
    }

    /// Classify a raw SSID. Never fails; every problem becomes a reason.
    #[must_use]
    pub fn validate(&self, raw: &str) -> SsidVerdict {
        self.classify(raw, raw.trim().len())
    }

    /// Classify raw SSID octets, reporting undecodable bytes as
    /// `invalid_encoding` rather than failing. The length bound applies to
    /// the octets, not to the longer lossy decoding.
    #[must_use]
    pub fn validate_bytes(&self, raw: &[u8]) -> SsidVerdict {
        let decoded = String::from_utf8_lossy(raw);
        // Replacement characters are never whitespace, so trimming removes the
        // same bytes from both forms.
        let trimmed_octets = raw.len().saturating_sub(decoded.len() - decoded.trim().len());
        self.classify(&decoded, trimmed_octets)
    }

    /// Classify a captured record, using its octets when it did not decode.
    #[must_use]
    pub fn validate_record(&self, record: &ProbeRecord) -> SsidVerdict {
        match &record.undecoded {
            Some(octets) => self.validate_bytes(octets),
            None => self.validate(&record.ssid),
        }
    }

    /// `octets` is the length of the trimmed SSID as captured.
    fn classify(&self, raw: &str, octets: usize) -> SsidVerdict {
        let mut found: Vec<String> = Vec::new();
        let mut push = |reason: &str| {
            if !found.iter().any(|r| r == reason) {
                found.push(reason.to_string());
            }
        };

        let trimmed = raw.trim();

        // Rule 1
        if trimmed.is_empty() {
            push(reasons::EMPTY);
        }

        // Rule 2
        if !trimmed.is_empty() && trimmed.chars().count() < self.min_length {
            push(reasons::TOO_SHORT);
        }
        if octets > self.max_bytes {
            push(reasons::TOO_LONG);
        }
        let has_printable = trimmed.chars().any(is_printable);
        if has_printable && !trimmed.chars().any(char::is_alphanumeric) {
            push(reasons::NO_ALPHANUMERIC);
        }

        // Rule 3
        if !trimmed.is_empty() {
            for rule in &self.placeholders {
                if rule.matches(trimmed) {
                    push(rule.reason());
                }
            }
            if self.reject_repeated_characters && is_repeated_character(trimmed) {
                push(reasons::REPEATED_CHARACTER);
            }
        }

        // Rule 4: whitespace-only input is already covered by rule 1.
        let only_unprintable = !raw.chars().any(|c| is_printable(c) && c != ' ');
        if only_unprintable && raw.chars().any(|c| !c.is_whitespace() || c.is_control()) {
            push(reasons::NON_PRINTABLE);
        }

        if raw.contains(char::REPLACEMENT_CHARACTER) {
            push(reasons::INVALID_ENCODING);
        }

        SsidVerdict {
            ssid: raw.to_string(),
            normalized: normalize_ssid(raw),
            accepted: found.is_empty(),
            reasons: found,
        }
    }
}

fn is_printable(c: char) -> bool {
    !c.is_control() && !is_invisible_format(c)
}

/// Zero-width and byte-order characters that render as nothing.
const fn is_invisible_format(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}

/// Case-insensitive, so every spelling of one cache key gets the same verdict.
fn is_repeated_character(s: &str) -> bool {
    let folded = s.to_lowercase();
    let mut chars = folded.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let mut len = 1usize;
    for c in chars {
        if c != first {
            return false;
        }
        len += 1;
    }
    len >= 2
}

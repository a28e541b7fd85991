use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of running the validation rule set over one raw SSID.
///
/// `reasons` lists every violated rule in rule order and is empty exactly when
/// `accepted` is true.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SsidVerdict {
    /// The SSID as captured, kept for display.
    pub ssid: String,
    /// Trimmed, case-folded cache key.
    pub normalized: String,
    pub accepted: bool,
    pub reasons: Vec<String>,
}

impl SsidVerdict {
    /// Whether the verdict carries the given rejection reason.
    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons.iter().any(|r| r == reason)
    }
}

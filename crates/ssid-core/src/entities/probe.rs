use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One observed probe-request frame, as handed over by the capture layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProbeRecord {
    pub ssid: String,
    pub captured_at: DateTime<Utc>,
    /// Captured octets, kept only when they were not valid UTF-8 and `ssid`
    /// is their lossy decoding.
    #[serde(skip)]
    pub undecoded: Option<Vec<u8>>,
}

impl ProbeRecord {
    #[must_use]
    pub fn new(ssid: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            ssid: ssid.into(),
            captured_at,
            undecoded: None,
        }
    }

    /// Build a record from raw SSID octets. Invalid UTF-8 is decoded lossily
    /// and the octets are kept for validation.
    #[must_use]
    pub fn from_octets(octets: &[u8], captured_at: DateTime<Utc>) -> Self {
        match std::str::from_utf8(octets) {
            Ok(ssid) => Self::new(ssid, captured_at),
            Err(_) => Self {
                ssid: String::from_utf8_lossy(octets).into_owned(),
                captured_at,
                undecoded: Some(octets.to_vec()),
            },
        }
    }
}

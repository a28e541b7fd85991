use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;

/// A successfully resolved SSID bound to the map artifact that shows it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResolvedPoint {
    /// Display SSID (original spelling).
    pub ssid: String,
    pub lat: f64,
    pub lon: f64,
    pub resolved_at: DateTime<Utc>,
    /// File name of the per-point artifact, unique within a run.
    pub map_file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ResolvedPoint {
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

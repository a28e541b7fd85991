//! Offline location source.

use ssid_core::entities::Coordinate;
use ssid_core::normalize_ssid;

use crate::{LocationSource, LookupError, LookupOutcome};

/// Centre of the area mock coordinates are spread over (Birmingham, UK).
const MOCK_CENTRE: Coordinate = Coordinate::new(52.4862, -1.8904);

/// Half-width of the spread, in degrees.
const MOCK_SPREAD: f64 = 0.05;

/// Answers every SSID with a coordinate derived from its cache key, so the
/// same SSID always lands on the same spot and different SSIDs spread out.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The coordinate reported for `ssid`.
    #[must_use]
    pub fn coordinate_for(ssid: &str) -> Coordinate {
        let hash = fnv1a(normalize_ssid(ssid).as_bytes());
        let lat = MOCK_CENTRE.lat + offset(hash);
        let lon = MOCK_CENTRE.lon + offset(hash >> 32);
        Coordinate::new(round6(lat), round6(lon))
    }
}

impl LocationSource for MockSource {
    fn source_name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, ssid: &str) -> Result<LookupOutcome, LookupError> {
        Ok(LookupOutcome::Found {
            coordinate: Self::coordinate_for(ssid),
            address: None,
        })
    }
}

/// FNV-1a, 64-bit. Stable across builds and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Map the low 16 bits of `bits` onto `[-MOCK_SPREAD, MOCK_SPREAD]`.
fn offset(bits: u64) -> f64 {
    let unit = f64::from(u16::try_from(bits & 0xffff).unwrap_or(0)) / f64::from(u16::MAX);
    (unit * 2.0 - 1.0) * MOCK_SPREAD
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

//! # ssid-wigle
//!
//! Location sources for ssidmap.
//!
//! A [`LocationSource`] answers "where was this SSID seen?" with either a raw
//! coordinate, an explicit no-data outcome, or a [`LookupError`]. Two sources
//! exist:
//! - [`WigleClient`] queries the WiGLE network search API with basic auth.
//! - [`MockSource`] answers offline with a deterministic coordinate per SSID.
//!
//! Sources do not judge coordinates; plausibility checks belong to the
//! resolver. Every client failure maps onto the shared
//! [`FailureKind`](ssid_core::enums::FailureKind) taxonomy via
//! [`LookupError::kind`].

mod error;
mod http;
mod mock;
mod wigle;

pub use error::LookupError;
pub use mock::MockSource;
pub use wigle::WigleClient;

use std::future::Future;

use ssid_core::entities::Coordinate;
use ssid_core::enums::NotFoundReason;

// ── Types ──────────────────────────────────────────────────────────

/// Successful answer from a location source.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The source reported a position. Not yet validated.
    Found {
        coordinate: Coordinate,
        address: Option<String>,
    },
    /// The source answered but has nothing usable for this SSID.
    NoData(NotFoundReason),
}

// ── Port ───────────────────────────────────────────────────────────

/// Port to an external SSID geolocation backend.
pub trait LocationSource {
    /// Short name recorded as the cache entry `source` (`wigle`, `mock`).
    fn source_name(&self) -> &str;

    /// Look up one SSID (display form, not the cache key).
    fn lookup(
        &self,
        ssid: &str,
    ) -> impl Future<Output = Result<LookupOutcome, LookupError>> + Send;
}

/// Runtime choice between the live client and the mock source.
pub enum AnySource {
    Wigle(WigleClient),
    Mock(MockSource),
}

impl LocationSource for AnySource {
    fn source_name(&self) -> &str {
        match self {
            Self::Wigle(client) => client.source_name(),
            Self::Mock(mock) => mock.source_name(),
        }
    }

    async fn lookup(&self, ssid: &str) -> Result<LookupOutcome, LookupError> {
        match self {
            Self::Wigle(client) => client.lookup(ssid).await,
            Self::Mock(mock) => mock.lookup(ssid).await,
        }
    }
}

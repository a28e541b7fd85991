//! Entity structs for the ssidmap pipeline data model.
//!
//! The normalized SSID is the join key linking every entity:
//! `ProbeRecord → SsidVerdict → CacheEntry → ResolvedPoint`.

mod cache_entry;
mod coordinate;
mod point;
mod probe;
mod summary;
mod verdict;

pub use cache_entry::CacheEntry;
pub use coordinate::Coordinate;
pub use point::ResolvedPoint;
pub use probe::ProbeRecord;
pub use summary::SessionSummary;
pub use verdict::SsidVerdict;

//! # ssid-cache
//!
//! Durable key-value store mapping a normalized SSID to the outcome of a
//! previous lookup, so a given SSID is sent to the lookup service at most once
//! across the lifetime of the cache file.
//!
//! The store is a single pretty-printed JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": [
//!     { "normalized_ssid": "homenet42", "status": "resolved",
//!       "coordinate": { "lat": 51.5, "lon": -0.12 },
//!       "resolved_at": "2025-01-01T12:00:00Z", "source": "wigle" }
//!   ]
//! }
//! ```
//!
//! Entries are sorted by key. Every write goes to a temporary file in the same
//! directory which is then renamed over the store, so an interrupted run never
//! leaves a truncated file behind. A missing store loads as empty; an
//! unreadable one is moved aside to `<file>.corrupt` and the cache starts
//! empty.

mod error;
mod file;
mod store;

pub use error::CacheError;
pub use file::{CACHE_FORMAT_VERSION, CacheFile, cache_file_schema, corrupt_path};
pub use store::{CacheStats, Durability, ResolutionCache};

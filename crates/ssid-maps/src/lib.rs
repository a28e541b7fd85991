//! # ssid-maps
//!
//! Map artifacts for ssidmap.
//!
//! - [`MapEmitter`] writes one HTML map per resolved SSID plus a summary map
//!   of every point in the run. Names are derived from the SSID and the
//!   emission time and never collide, neither within a run nor with files
//!   already on disk. Every file is written to a temporary path and renamed
//!   into place, so readers never see a truncated map.
//! - [`render`] builds the self-contained Leaflet page.
//! - [`housekeeping`] lists and prunes generated artifacts.
//! - [`write_points_csv`] exports the resolved points of a run.

pub mod housekeeping;
pub mod render;

mod emitter;
mod error;
mod export;
mod naming;

pub use emitter::{MapEmitter, publish_atomic};
pub use error::MapError;
pub use export::write_points_csv;
pub use housekeeping::{Artifact, list_artifacts, remove_older_than};
pub use naming::{MAX_NAME_SSID_CHARS, sanitize_ssid};

//! # ssid-core
//!
//! Core types, SSID validation, and session reporting for ssidmap.
//!
//! This crate provides the foundational types shared across all ssidmap crates:
//! - Entity structs for the pipeline data model (probe records, verdicts,
//!   cache entries, resolved points, session summaries)
//! - Status and failure enums
//! - The ordered SSID validation rule set
//! - The session reporter that accumulates run statistics
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod report;
pub mod validate;

pub use errors::CoreError;
pub use validate::{SsidValidator, normalize_ssid};

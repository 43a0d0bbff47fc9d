//! Shared types for provisioning config ingestion.
//!
//! This crate provides foundational types shared by the ingestion pipeline
//! and its front ends:
//! - Schema versioning (legacy vs current)
//! - Terminal error kinds
//! - Byte offset to line/column resolution
//! - Severity-tagged diagnostic reports

pub mod error;
pub mod position;
pub mod report;
pub mod schema;

pub use error::ConfigError;
pub use position::{offset_of, resolve, Position};
pub use report::{Entry, Report, Severity};
pub use schema::{SchemaVersion, VersionError, CURRENT_MAJOR, LEGACY_MAJOR, MAX_VERSION};

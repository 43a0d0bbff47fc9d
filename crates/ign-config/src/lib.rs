//! Provisioning config ingestion.
//!
//! This crate provides:
//! - Format classification of raw userdata (empty, cloud-config, script, structured)
//! - Best-effort schema version sniffing
//! - Legacy (v1) decoding and translation to the current schema
//! - Typed decoding with syntax/type failures carrying byte offsets
//! - Semantic validation with findings positioned via a span-tracking tree
//! - The [`parse`] and [`parse_current`] entry points tying it together

pub mod classify;
pub mod decode;
pub mod legacy;
pub mod node;
pub mod options;
pub mod path;
pub mod pipeline;
pub mod sniff;
pub mod types;
pub mod validate;

pub use classify::{classify, Format, FormatMarkers, MarkerRule};
pub use decode::{decode, DecodeError};
pub use options::{OptionsError, ParserOptions};
pub use path::{FieldPath, Segment};
pub use pipeline::{parse, parse_current, ParseOutcome, Parser};
pub use sniff::sniff_version;
pub use types::Config;
pub use validate::{Finding, Rule, RuleSet};

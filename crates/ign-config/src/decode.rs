//! Typed decoding with byte-offset failures.
//!
//! serde_json reports failures as line/column; they are converted back to a
//! byte offset in the same input so callers can resolve positions uniformly.

use ign_common::{offset_of, resolve, Entry, Severity};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

/// Why the typed decode failed. Both shapes are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not well-formed JSON.
    #[error("{message}")]
    Syntax { offset: usize, message: String },

    /// Well-formed JSON whose shape does not match the expected type.
    #[error("{message}")]
    Type { offset: usize, message: String },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Syntax { offset, .. } | DecodeError::Type { offset, .. } => *offset,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DecodeError::Syntax { message, .. } | DecodeError::Type { message, .. } => message,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, DecodeError::Syntax { .. })
    }

    /// Classify a serde_json failure over `raw`.
    pub fn from_json(raw: &[u8], err: &serde_json::Error) -> Self {
        let message = strip_position(err);
        match err.classify() {
            Category::Eof => DecodeError::Syntax {
                offset: raw.len(),
                message,
            },
            category => {
                let offset = offset_of(raw, err.line(), err.column()).min(raw.len());
                match category {
                    Category::Data => DecodeError::Type { offset, message },
                    _ => DecodeError::Syntax { offset, message },
                }
            }
        }
    }

    /// Error entry positioned at the failure offset in `raw`.
    pub fn to_entry(&self, raw: &[u8]) -> Entry {
        Entry::new(Severity::Error, self.message()).at(resolve(raw, self.offset()))
    }
}

/// Decode `raw` into `T`.
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(raw).map_err(|err| DecodeError::from_json(raw, &err))
}

/// serde_json appends " at line L column C" to its messages; the report
/// carries the position separately.
fn strip_position(err: &serde_json::Error) -> String {
    let text = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match text.strip_suffix(&suffix) {
        Some(message) => message.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Config;

    #[test]
    fn test_syntax_failure() {
        let raw = b"{\"ignition\": }";
        let err = decode::<Config>(raw).unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(raw[err.offset()], b'}');
        assert!(!err.message().contains("line"));
    }

    #[test]
    fn test_type_failure() {
        let raw = br#"{"storage": "not-an-object"}"#;
        let err = decode::<Config>(raw).unwrap_err();
        assert!(matches!(err, DecodeError::Type { .. }));
        let start = 12;
        assert!(err.offset() >= start && err.offset() < start + "\"not-an-object\"".len());
        assert!(err.message().starts_with("invalid type"));
    }

    #[test]
    fn test_truncated_input_is_syntax() {
        let raw = b"{\"ignition\": {";
        let err = decode::<Config>(raw).unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.offset(), raw.len());
    }

    #[test]
    fn test_error_after_newline_stays_on_its_line() {
        let raw = b"{\n\"ignition\": tru\n}";
        let err = decode::<Config>(raw).unwrap_err();
        assert!(err.is_syntax());
        let pos = err.to_entry(raw).position.unwrap();
        assert_eq!(pos.line, 2);
        assert!(pos.highlight.contains("tru"));
        assert!(!pos.highlight.contains("    3:"));
    }

    #[test]
    fn test_entry_is_positioned_error() {
        let raw = b"{\n  \"systemd\": 5\n}";
        let err = decode::<Config>(raw).unwrap_err();
        let entry = err.to_entry(raw);
        assert_eq!(entry.severity, Severity::Error);
        let pos = entry.position.unwrap();
        assert_eq!(pos.line, 2);
    }

    #[test]
    fn test_success() {
        let config: Config = decode(br#"{"ignition": {"version": {"major": 2}}}"#).unwrap();
        assert_eq!(config.ignition.version.major, 2);
    }
}

//! Severity-tagged diagnostic reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::Position;

/// Severity of a report entry. Only `Error` is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Deprecated,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A single diagnostic. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Entry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            position: None,
        }
    }

    /// Attach a resolved position.
    pub fn at(self, position: Position) -> Self {
        Self {
            position: Some(position),
            ..self
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(
                f,
                "{} at line {}, column {}: {}\n{}",
                self.severity, pos.line, pos.column, self.message, pos.highlight
            ),
            None => writeln!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered collection of entries. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    pub entries: Vec<Entry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single position-less entry carrying an error's message.
    pub fn from_error(err: &dyn std::error::Error, severity: Severity) -> Self {
        Self {
            entries: vec![Entry::new(severity, err.to_string())],
        }
    }

    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Append all of `other`'s entries after this report's entries.
    pub fn merge(&mut self, other: Report) {
        self.entries.extend(other.entries);
    }

    /// True iff any entry has `Error` severity.
    pub fn is_fatal(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }
}

impl From<Entry> for Report {
    fn from(entry: Entry) -> Self {
        Self {
            entries: vec![entry],
        }
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

//! Byte offset to line/column resolution.
//!
//! Lines and columns are 1-indexed. Columns count bytes from the start of the
//! line, so they agree with offsets reported by byte-oriented decoders.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Human-readable location of a byte offset in the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// Preceding line, offending line and a caret marker, newline-terminated.
    pub highlight: String,
}

/// Width of the `"{:>5}: "` gutter in front of each highlighted line.
const GUTTER: usize = 7;

/// Resolve `offset` against `raw`.
///
/// # Panics
///
/// Panics if `offset > raw.len()`. Offsets must come from a decoder that ran
/// over the same bytes.
pub fn resolve(raw: &[u8], offset: usize) -> Position {
    assert!(
        offset <= raw.len(),
        "offset {offset} outside input of {} bytes",
        raw.len()
    );

    let before = &raw[..offset];
    let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let line_end = raw[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(raw.len(), |i| offset + i);
    let column = offset - line_start + 1;

    let mut highlight = String::new();
    if line_start > 0 {
        let prev_end = line_start - 1;
        let prev_start = raw[..prev_end]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let _ = writeln!(
            highlight,
            "{:>5}: {}",
            line - 1,
            display_line(&raw[prev_start..prev_end])
        );
    }
    let _ = writeln!(
        highlight,
        "{:>5}: {}",
        line,
        display_line(&raw[line_start..line_end])
    );
    // Align the caret by characters so multi-byte text does not skew it.
    let width = String::from_utf8_lossy(&raw[line_start..offset])
        .chars()
        .count();
    let _ = writeln!(highlight, "{}^", " ".repeat(GUTTER + width));

    Position {
        line,
        column,
        highlight,
    }
}

/// Inverse of [`resolve`]: byte offset of a 1-indexed `(line, column)`.
///
/// Out-of-range coordinates are clamped to the end of the line or input.
/// Column 0 names the newline ending the previous line (decoders report it
/// after consuming that newline); on the first line it is the first byte.
pub fn offset_of(raw: &[u8], line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line {
        match raw[line_start..].iter().position(|&b| b == b'\n') {
            Some(i) => line_start += i + 1,
            None => return raw.len(),
        }
    }
    if column == 0 && line_start > 0 {
        return line_start - 1;
    }
    let line_len = raw[line_start..]
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(raw.len() - line_start);
    line_start + column.saturating_sub(1).min(line_len)
}

fn display_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_suffix('\r').unwrap_or(&text).to_string()
}

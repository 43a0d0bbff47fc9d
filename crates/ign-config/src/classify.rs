//! Format classification of raw userdata, before any decoding.

use serde::{Deserialize, Serialize};

/// What kind of document the raw bytes appear to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Zero bytes. Whitespace-only input is not empty.
    Empty,
    /// A cloud-config document meant for a different provisioning agent.
    CloudConfig,
    /// A shell script.
    Script,
    /// Anything else: decode it and see.
    Structured,
}

/// How a marker is matched against the first line of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerRule {
    /// First line, without a trailing `\r`, equals the marker.
    FirstLine(String),
    /// First line starts with the marker.
    Prefix(String),
}

impl MarkerRule {
    pub fn matches(&self, first_line: &[u8]) -> bool {
        match self {
            MarkerRule::FirstLine(marker) => {
                let line = first_line.strip_suffix(b"\r").unwrap_or(first_line);
                line == marker.as_bytes()
            }
            MarkerRule::Prefix(marker) => first_line.starts_with(marker.as_bytes()),
        }
    }
}

/// Marker sets for the non-config formats. Cloud-config markers are tested
/// before script markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatMarkers {
    pub cloud_config: Vec<MarkerRule>,
    pub script: Vec<MarkerRule>,
}

impl Default for FormatMarkers {
    fn default() -> Self {
        Self {
            cloud_config: vec![MarkerRule::FirstLine("#cloud-config".to_string())],
            script: vec![MarkerRule::Prefix("#!".to_string())],
        }
    }
}

/// Classify `raw`. Pure: the same bytes always give the same answer.
pub fn classify(raw: &[u8], markers: &FormatMarkers) -> Format {
    if raw.is_empty() {
        return Format::Empty;
    }
    let first_line = raw
        .iter()
        .position(|&b| b == b'\n')
        .map_or(raw, |i| &raw[..i]);
    if markers.cloud_config.iter().any(|m| m.matches(first_line)) {
        Format::CloudConfig
    } else if markers.script.iter().any(|m| m.matches(first_line)) {
        Format::Script
    } else {
        Format::Structured
    }
}

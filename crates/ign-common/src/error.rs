//! Terminal error kinds for config ingestion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a pipeline run did not produce a config.
///
/// These are returned as data alongside a [`crate::Report`], never thrown.
/// `Empty`, `ForeignFormat` and `Script` mean "not a config in this format,
/// try another handler" and always come with an empty report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigError {
    #[error("not a config (empty)")]
    Empty,

    #[error("not a config (found cloud-config)")]
    ForeignFormat,

    #[error("not a config (found script)")]
    Script,

    #[error("config format deprecated")]
    Deprecated,

    #[error("config is not valid")]
    Invalid,
}

impl ConfigError {
    /// Whether this kind prevents a config from being produced.
    ///
    /// `Deprecated` is informational: the legacy path surfaces it as a
    /// report entry next to a translated config.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ConfigError::Deprecated)
    }

    /// Whether the input was recognised as some other kind of userdata.
    pub fn is_not_a_config(self) -> bool {
        matches!(
            self,
            ConfigError::Empty | ConfigError::ForeignFormat | ConfigError::Script
        )
    }

    /// Stable snake_case name, used in machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigError::Empty => "empty",
            ConfigError::ForeignFormat => "foreign_format",
            ConfigError::Script => "script",
            ConfigError::Deprecated => "deprecated",
            ConfigError::Invalid => "invalid",
        }
    }
}

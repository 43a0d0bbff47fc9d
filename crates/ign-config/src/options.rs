//! Tunable parser settings, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::FormatMarkers;
use crate::validate::RuleSet;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("cannot read options file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown rule {0:?} in disabledRules")]
    UnknownRule(String),
}

/// Parser settings.
///
/// ```json
/// {
///   "markers": {"cloudConfig": [{"firstLine": "#cloud-config"}], "script": [{"prefix": "#!"}]},
///   "disabledRules": ["empty-config"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    pub markers: FormatMarkers,
    /// Names of standard rules to skip.
    pub disabled_rules: Vec<String>,
}

impl ParserOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: display.clone(),
            source,
        })?;
        let options = Self::from_json(&content).map_err(|source| OptionsError::Parse {
            path: display,
            source,
        })?;
        options.rule_set()?;
        Ok(options)
    }

    /// The standard catalog minus disabled rules.
    pub fn rule_set(&self) -> Result<RuleSet, OptionsError> {
        let known = RuleSet::standard().names();
        if let Some(unknown) = self
            .disabled_rules
            .iter()
            .find(|name| !known.contains(&name.as_str()))
        {
            return Err(OptionsError::UnknownRule(unknown.clone()));
        }
        Ok(RuleSet::standard().without(&self.disabled_rules))
    }
}

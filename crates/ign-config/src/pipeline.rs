//! Pipeline orchestration: classification, version routing, decoding and
//! validation.
//!
//! The pipeline only sequences the stages and decides which failures end the
//! run. Entries produced by a stage are passed through in the order the stage
//! emitted them.

use ign_common::{ConfigError, Entry, Report, SchemaVersion, Severity};
use tracing::debug;

use crate::classify::{classify, Format};
use crate::decode::decode;
use crate::legacy;
use crate::options::{OptionsError, ParserOptions};
use crate::sniff::sniff_version;
use crate::types::Config;
use crate::validate::{validate, RuleSet};

/// Result of one pipeline run.
///
/// A report is always present, including on failure. `result` holds the
/// accepted config or the terminal kind explaining why there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub result: Result<Config, ConfigError>,
    pub report: Report,
}

impl ParseOutcome {
    fn accepted(config: Config, report: Report) -> Self {
        Self {
            result: Ok(config),
            report,
        }
    }

    fn rejected(kind: ConfigError, report: Report) -> Self {
        Self {
            result: Err(kind),
            report,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn config(&self) -> Option<&Config> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<ConfigError> {
        self.result.as_ref().err().copied()
    }

    pub fn into_parts(self) -> (Result<Config, ConfigError>, Report) {
        (self.result, self.report)
    }
}

/// A configured pipeline. Immutable once built; share it freely.
#[derive(Debug, Default)]
pub struct Parser {
    options: ParserOptions,
    rules: RuleSet,
}

impl Parser {
    /// Pipeline with the default markers and the standard rule catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: ParserOptions) -> Result<Self, OptionsError> {
        let rules = options.rule_set()?;
        Ok(Self { options, rules })
    }

    /// Pipeline with an explicit rule catalog.
    pub fn with_rules(options: ParserOptions, rules: RuleSet) -> Self {
        Self { options, rules }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Version-aware entry point.
    ///
    /// Documents whose sniffed major version is the legacy one are decoded
    /// under the legacy grammar and translated; a successful translation
    /// carries exactly one `Deprecated` entry. Everything else goes through
    /// [`Parser::parse_current`].
    pub fn parse(&self, raw: &[u8]) -> ParseOutcome {
        match sniff_version(raw) {
            Some(version) if version.is_legacy() => {
                debug!(%version, "routing to legacy translator");
                self.parse_legacy(raw)
            }
            version => {
                debug!(version = ?version.map(|v| v.to_string()), "routing to current decoder");
                self.parse_current(raw)
            }
        }
    }

    /// Parse `raw` as a current-schema document only.
    pub fn parse_current(&self, raw: &[u8]) -> ParseOutcome {
        let format = classify(raw, &self.options.markers);
        debug!(?format, bytes = raw.len(), "classified input");
        match format {
            Format::Empty => return ParseOutcome::rejected(ConfigError::Empty, Report::new()),
            Format::CloudConfig => {
                return ParseOutcome::rejected(ConfigError::ForeignFormat, Report::new())
            }
            Format::Script => return ParseOutcome::rejected(ConfigError::Script, Report::new()),
            Format::Structured => {}
        }

        let sniffed = sniff_version(raw).unwrap_or(SchemaVersion::UNSPECIFIED);
        debug!(version = %sniffed, "sniffed version");

        let config: Config = match decode(raw) {
            Ok(config) => config,
            Err(err) => {
                debug!(
                    syntax = err.is_syntax(),
                    offset = err.offset(),
                    "decode failed"
                );
                return ParseOutcome::rejected(ConfigError::Invalid, Report::from(err.to_entry(raw)));
            }
        };

        if let Err(err) = config.ignition.version.check_supported() {
            debug!(version = %config.ignition.version, "version out of range");
            return ParseOutcome::rejected(
                ConfigError::Invalid,
                Report::from(Entry::new(Severity::Error, err.to_string())),
            );
        }

        let report = validate(&config, raw, &self.rules);
        debug!(
            entries = report.len(),
            errors = report.count(Severity::Error),
            "validation finished"
        );
        if report.is_fatal() {
            return ParseOutcome::rejected(ConfigError::Invalid, report);
        }
        ParseOutcome::accepted(config, report)
    }

    fn parse_legacy(&self, raw: &[u8]) -> ParseOutcome {
        match legacy::parse(raw) {
            Ok(config) => {
                debug!("legacy config translated");
                ParseOutcome::accepted(
                    legacy::translate(config),
                    Report::from_error(&ConfigError::Deprecated, Severity::Deprecated),
                )
            }
            Err(err) => {
                debug!(error = %err, "legacy config rejected");
                ParseOutcome::rejected(ConfigError::Invalid, err.to_report(raw))
            }
        }
    }
}

/// [`Parser::parse`] with default settings.
pub fn parse(raw: &[u8]) -> ParseOutcome {
    Parser::new().parse(raw)
}

/// [`Parser::parse_current`] with default settings.
pub fn parse_current(raw: &[u8]) -> ParseOutcome {
    Parser::new().parse_current(raw)
}

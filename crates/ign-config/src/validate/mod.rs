//! Semantic validation of decoded configs.
//!
//! Rules inspect a typed [`Config`] and emit [`Finding`]s addressed by a
//! logical [`FieldPath`]. The validator turns findings into report entries,
//! resolving each path against a [`node`](crate::node) tree of the same
//! input to attach a line/column. When that tree cannot be built the
//! findings are reported without positions, after a warning saying so.

pub mod rules;

use ign_common::{resolve, Entry, Report, Severity};
use tracing::{debug, trace, warn};

use crate::node::{self, Node};
use crate::path::FieldPath;
use crate::types::Config;

pub use rules::{
    ConfigReferencesRule, DisksRule, EmptyConfigRule, FilesRule, FilesystemsRule,
    NetworkdUnitsRule, PasswdRule, RaidRule, SystemdUnitsRule,
};

/// Message of the warning emitted when positions cannot be resolved.
pub const POSITIONS_UNAVAILABLE: &str =
    "could not re-parse the config to resolve line numbers; findings are reported without positions";

/// One rule's verdict about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub path: FieldPath,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            severity,
            path,
            message: message.into(),
        }
    }

    pub fn error(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, path, message)
    }

    pub fn warning(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, path, message)
    }

    pub fn info(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, path, message)
    }

    /// Entry without a position.
    pub fn to_entry(&self) -> Entry {
        Entry::new(self.severity, format!("{}: {}", self.path, self.message))
    }

    /// Entry positioned at the node `path` resolves to in `tree`.
    pub fn to_positioned_entry(&self, tree: &Node, raw: &[u8]) -> Entry {
        self.to_entry().at(resolve(raw, tree.locate(&self.path)))
    }
}

/// A semantic check over a decoded config.
///
/// Rules are pure: the same config always yields the same findings, in the
/// same order.
pub trait Rule: Send + Sync {
    /// Stable identifier, used to disable the rule.
    fn name(&self) -> &'static str;

    fn check(&self, config: &Config, out: &mut Vec<Finding>);
}

/// Ordered rule catalog.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// A catalog with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in catalog.
    pub fn standard() -> Self {
        Self::empty()
            .with(ConfigReferencesRule)
            .with(DisksRule)
            .with(RaidRule)
            .with(FilesystemsRule)
            .with(FilesRule)
            .with(SystemdUnitsRule)
            .with(NetworkdUnitsRule)
            .with(PasswdRule)
            .with(EmptyConfigRule)
    }

    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Drop every rule whose name is in `names`.
    pub fn without<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        self.rules
            .retain(|rule| !names.iter().any(|n| n.as_ref() == rule.name()));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order.
    pub fn check(&self, config: &Config) -> Vec<Finding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let before = findings.len();
            rule.check(config, &mut findings);
            trace!(
                rule = rule.name(),
                findings = findings.len() - before,
                "rule evaluated"
            );
        }
        findings
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Validate `config`, resolving positions against `raw`.
pub fn validate(config: &Config, raw: &[u8], rules: &RuleSet) -> Report {
    let findings = rules.check(config);
    report_findings(&findings, raw)
}

/// Validate `config` without any source to resolve positions against.
pub fn validate_without_source(config: &Config, rules: &RuleSet) -> Report {
    unpositioned(&rules.check(config))
}

/// Turn findings into report entries, positioned when `raw` can be parsed
/// into a node tree.
pub fn report_findings(findings: &[Finding], raw: &[u8]) -> Report {
    match node::parse(raw) {
        Ok(tree) => {
            debug!(findings = findings.len(), "resolving finding positions");
            let mut report = Report::new();
            for finding in findings {
                report.add(finding.to_positioned_entry(&tree, raw));
            }
            report
        }
        Err(err) => {
            warn!(error = %err, "position tree unavailable");
            let mut report = Report::from(Entry::new(Severity::Warning, POSITIONS_UNAVAILABLE));
            report.merge(unpositioned(findings));
            report
        }
    }
}

fn unpositioned(findings: &[Finding]) -> Report {
    let mut report = Report::new();
    for finding in findings {
        report.add(finding.to_entry());
    }
    report
}

//! Rendering of check results for humans and machines.

use std::fmt::Write as _;

use clap::ValueEnum;
use ign_common::Report;
use ign_config::types::Config;
use ign_config::ParseOutcome;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Diagnostics with source excerpts
    #[default]
    Human,
    /// One JSON document on stdout
    Json,
}

/// Overall verdict of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Invalid,
    NotAConfig,
}

impl Status {
    pub fn of(outcome: &ParseOutcome) -> Self {
        match outcome.error() {
            None => Status::Ok,
            Some(kind) if kind.is_not_a_config() => Status::NotAConfig,
            Some(_) => Status::Invalid,
        }
    }
}

/// Machine-readable check result.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a Config>,
}

impl<'a> CheckOutput<'a> {
    pub fn new(outcome: &'a ParseOutcome, include_config: bool) -> Self {
        let config = outcome.config();
        Self {
            status: Status::of(outcome),
            error: outcome.error().map(|kind| kind.as_str()),
            version: config.map(|c| c.ignition.version.to_string()),
            report: &outcome.report,
            config: config.filter(|_| include_config),
        }
    }
}

pub fn render_json(outcome: &ParseOutcome, include_config: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CheckOutput::new(outcome, include_config))
}

/// Report entries followed by a one-line verdict for `source`.
pub fn render_human(
    outcome: &ParseOutcome,
    source: &str,
    include_config: bool,
) -> serde_json::Result<String> {
    let mut out = outcome.report.to_string();
    let verdict = match &outcome.result {
        Ok(config) => format!("ok (version {})", config.ignition.version),
        Err(kind) => kind.to_string(),
    };
    let _ = writeln!(out, "{source}: {verdict}");
    if let (true, Some(config)) = (include_config, outcome.config()) {
        out.push_str(&serde_json::to_string_pretty(config)?);
        out.push('\n');
    }
    Ok(out)
}

//! Legacy (major version 1) schema.
//!
//! Version 1 documents carry a flat `ignitionVersion` integer and attach
//! files to the filesystem they live on. Disks, raid arrays, units and
//! passwd entries have the same grammar as the current schema and reuse its
//! types. A legacy document is decoded, checked against the v1 grammar's own
//! constraints, then [translated](translate::translate) to the current
//! schema.

pub mod translate;

use ign_common::{Report, Severity, LEGACY_MAJOR};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{decode, DecodeError};
use crate::path::FieldPath;
use crate::types::{Disk, Networkd, Passwd, Raid, Systemd};
use crate::validate::rules::{
    check_disks, check_mode, check_networkd_units, check_passwd, check_raid,
    check_systemd_units, is_absolute,
};
use crate::validate::{report_findings, Finding};

pub use translate::translate;

/// Filesystem formats the v1 grammar accepts.
pub const LEGACY_FORMATS: &[&str] = &["ext4", "btrfs"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub ignition_version: u64,
    pub storage: Storage,
    pub systemd: Systemd,
    pub networkd: Networkd,
    pub passwd: Passwd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub disks: Vec<Disk>,
    pub raid: Vec<Raid>,
    pub filesystems: Vec<Filesystem>,
}

/// A device to format and the files to write onto it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filesystem {
    pub device: String,
    pub format: String,
    pub create: Option<FilesystemCreate>,
    pub files: Vec<File>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemCreate {
    pub force: bool,
    pub options: Vec<String>,
}

/// A file with inline plain-text contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    pub path: String,
    pub contents: String,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

/// Why a legacy document could not be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LegacyError {
    #[error("legacy config could not be decoded: {0}")]
    Decode(DecodeError),

    #[error("legacy config violates the version 1 grammar ({} problems)", .0.len())]
    Invalid(Vec<Finding>),
}

impl LegacyError {
    /// Report entries for this failure, positioned against `raw`.
    pub fn to_report(&self, raw: &[u8]) -> Report {
        match self {
            LegacyError::Decode(err) => Report::from(err.to_entry(raw)),
            LegacyError::Invalid(findings) => report_findings(findings, raw),
        }
    }
}

/// Decode `raw` under the legacy grammar and enforce its constraints.
pub fn parse(raw: &[u8]) -> Result<Config, LegacyError> {
    let config: Config = decode(raw).map_err(LegacyError::Decode)?;
    let findings = check(&config);
    if !findings.is_empty() {
        debug!(problems = findings.len(), "legacy config rejected");
        return Err(LegacyError::Invalid(findings));
    }
    Ok(config)
}

/// Constraints of the v1 grammar. Only errors; the legacy schema had no
/// advisory findings.
pub fn check(config: &Config) -> Vec<Finding> {
    let mut out = Vec::new();
    if config.ignition_version != LEGACY_MAJOR {
        out.push(Finding::error(
            FieldPath::key("ignitionVersion"),
            format!(
                "unsupported legacy version {}; expected {LEGACY_MAJOR}",
                config.ignition_version
            ),
        ));
    }

    let storage = FieldPath::key("storage");
    check_disks(&config.storage.disks, &storage.field("disks"), &mut out);
    check_raid(&config.storage.raid, &storage.field("raid"), &mut out);
    for (i, fs) in config.storage.filesystems.iter().enumerate() {
        let path = storage.field("filesystems").at(i);
        if !is_absolute(&fs.device) {
            out.push(Finding::error(
                path.field("device"),
                format!("filesystem device {:?} is not an absolute path", fs.device),
            ));
        }
        if !LEGACY_FORMATS.contains(&fs.format.as_str()) {
            out.push(Finding::error(
                path.field("format"),
                format!("invalid filesystem format {:?}", fs.format),
            ));
        }
        for (j, file) in fs.files.iter().enumerate() {
            let file_path = path.field("files").at(j);
            if !is_absolute(&file.path) {
                out.push(Finding::error(
                    file_path.field("path"),
                    format!("file path {:?} is not absolute", file.path),
                ));
            }
            check_mode(file.mode, file_path.field("mode"), &mut out);
        }
    }
    check_systemd_units(
        &config.systemd.units,
        &FieldPath::key("systemd").field("units"),
        &mut out,
    );
    check_networkd_units(
        &config.networkd.units,
        &FieldPath::key("networkd").field("units"),
        &mut out,
    );
    check_passwd(&config.passwd, &FieldPath::key("passwd"), &mut out);

    out.retain(|f| f.severity == Severity::Error);
    out
}

//! Current-schema (2.x) config types.
//!
//! Field names follow the wire format (camelCase). Every field except
//! `ignition.version` is optional and defaults to empty. Unknown fields are
//! ignored so newer producers do not break older consumers.

use ign_common::SchemaVersion;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A provisioning config in the current schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub ignition: Ignition,
    pub storage: Storage,
    pub systemd: Systemd,
    pub networkd: Networkd,
    pub passwd: Passwd,
}

impl Config {
    /// True when the config carries no provisioning directives at all.
    pub fn is_noop(&self) -> bool {
        self.ignition.config.append.is_empty()
            && self.ignition.config.replace.is_none()
            && self.storage == Storage::default()
            && self.systemd.units.is_empty()
            && self.networkd.units.is_empty()
            && self.passwd.users.is_empty()
            && self.passwd.groups.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Ignition {
    pub version: SchemaVersion,
    pub config: IgnitionConfig,
}

/// Other configs to merge with or replace this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IgnitionConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub append: Vec<ConfigReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<ConfigReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigReference {
    pub source: String,
    pub verification: Verification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Verification {
    /// `sha512-<hex digest>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

// ── Storage ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Storage {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<Disk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raid: Vec<Raid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filesystems: Vec<Filesystem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Disk {
    pub device: String,
    pub wipe_table: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<Partition>,
}

/// A GPT partition. `size` and `start` are in sectors; 0 means "default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Partition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub number: u32,
    pub size: u64,
    pub start: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Raid {
    pub name: String,
    pub level: RaidLevel,
    pub devices: Vec<String>,
    pub spares: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Filesystem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<FilesystemMount>,
    /// Already-mounted path to use instead of a device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilesystemMount {
    pub device: String,
    pub format: FilesystemFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<FilesystemCreate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilesystemCreate {
    pub force: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct File {
    pub filesystem: String,
    pub path: String,
    pub contents: FileContents,
    pub mode: u32,
    pub user: FileOwner,
    pub group: FileOwner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FileContents {
    pub compression: Compression,
    /// URL of the contents; `data:` URLs carry them inline.
    pub source: String,
    pub verification: Verification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FileOwner {
    pub id: u32,
}

// ── Units ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Systemd {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<SystemdUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SystemdUnit {
    pub name: String,
    pub enable: bool,
    pub mask: bool,
    pub contents: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropins: Vec<SystemdDropin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SystemdDropin {
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Networkd {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<NetworkdUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NetworkdUnit {
    pub name: String,
    pub contents: String,
}

// ── Passwd ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Passwd {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<UserCreate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UserCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gecos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,
    pub no_create_home: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    pub no_user_group: bool,
    pub system: bool,
    pub no_log_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub system: bool,
}

// ── Enumerated string fields ────────────────────────────────────────────

/// A string field whose value must come from a fixed set.
///
/// Values are kept as decoded so an unknown one survives decoding and is
/// reported, with its position, by the semantic validator.
pub trait EnumField {
    /// Accepted values.
    const VALID: &'static [&'static str];

    fn as_str(&self) -> &str;

    fn is_valid(&self) -> bool {
        Self::VALID.contains(&self.as_str())
    }
}

macro_rules! enum_field {
    ($(#[$meta:meta])* $name:ident, [$($value:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl EnumField for $name {
            const VALID: &'static [&'static str] = &[$($value),+];

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

enum_field!(
    /// Filesystem type to create or expect on a device.
    FilesystemFormat,
    ["ext4", "btrfs", "xfs"]
);

enum_field!(
    /// md RAID level.
    RaidLevel,
    ["linear", "raid0", "raid1", "raid4", "raid5", "raid6", "raid10"]
);

enum_field!(
    /// Compression applied to file contents; empty means none.
    Compression,
    ["", "gzip"]
);

impl RaidLevel {
    /// Levels that can make use of spare devices.
    pub fn supports_spares(&self) -> bool {
        !matches!(self.as_str(), "linear" | "raid0")
    }
}

//! The built-in rule catalog.
//!
//! Checks over groups that the legacy and current schemas share (disks,
//! raid, units, passwd) are free functions so the legacy grammar enforces
//! exactly the same constraints before translation.

use std::collections::HashSet;

use url::Url;

use super::{Finding, Rule};
use crate::path::FieldPath;
use crate::types::{
    Config, ConfigReference, Disk, EnumField, NetworkdUnit, Passwd, Raid, SystemdUnit,
    Verification,
};

/// URL schemes a fetcher is expected to understand.
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "data", "oem", "tftp", "s3"];

/// systemd unit types, by file suffix.
pub const SYSTEMD_UNIT_SUFFIXES: &[&str] = &[
    ".service",
    ".socket",
    ".device",
    ".mount",
    ".automount",
    ".swap",
    ".target",
    ".path",
    ".timer",
    ".snapshot",
    ".slice",
    ".scope",
];

pub const NETWORKD_UNIT_SUFFIXES: &[&str] = &[".link", ".netdev", ".network"];

/// Longest GPT partition label, in characters.
pub const MAX_PARTITION_LABEL: usize = 36;

/// Highest permission bits a file mode may carry.
pub const MAX_FILE_MODE: u32 = 0o7777;

/// Filesystem name that is always available to files.
pub const ROOT_FILESYSTEM: &str = "root";

// ── Shared checks ───────────────────────────────────────────────────────

pub(crate) fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` with hex digits.
pub(crate) fn is_guid(s: &str) -> bool {
    s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

fn one_of(valid: &[&str]) -> String {
    valid
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_enum<E: EnumField>(value: &E, what: &str, path: FieldPath, out: &mut Vec<Finding>) {
    if !value.is_valid() {
        out.push(Finding::error(
            path,
            format!(
                "invalid {what} {:?}; expected one of {}",
                value.as_str(),
                one_of(E::VALID)
            ),
        ));
    }
}

fn check_url(source: &str, path: FieldPath, out: &mut Vec<Finding>) {
    match Url::parse(source) {
        Ok(url) if SUPPORTED_SCHEMES.contains(&url.scheme()) => {}
        Ok(url) => out.push(Finding::error(
            path,
            format!("unsupported URL scheme {:?}", url.scheme()),
        )),
        Err(err) => out.push(Finding::error(path, format!("invalid URL: {err}"))),
    }
}

fn check_verification(verification: &Verification, path: FieldPath, out: &mut Vec<Finding>) {
    let Some(hash) = &verification.hash else {
        return;
    };
    let path = path.field("hash");
    match hash.split_once('-') {
        Some(("sha512", digest)) => match hex::decode(digest) {
            Ok(bytes) if bytes.len() == 64 => {}
            Ok(bytes) => out.push(Finding::error(
                path,
                format!("sha512 digest must be 64 bytes, got {}", bytes.len()),
            )),
            Err(err) => out.push(Finding::error(path, format!("invalid hex digest: {err}"))),
        },
        Some((function, _)) => out.push(Finding::error(
            path,
            format!("unsupported hash function {function:?}"),
        )),
        None => out.push(Finding::error(
            path,
            "hash must have the form <function>-<hex digest>",
        )),
    }
}

fn check_reference(reference: &ConfigReference, path: FieldPath, out: &mut Vec<Finding>) {
    if reference.source.is_empty() {
        out.push(Finding::error(path.field("source"), "config reference has no source"));
    } else {
        check_url(&reference.source, path.field("source"), out);
    }
    check_verification(&reference.verification, path.field("verification"), out);
}

pub(crate) fn check_disks(disks: &[Disk], base: &FieldPath, out: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for (i, disk) in disks.iter().enumerate() {
        let path = base.at(i);
        if !is_absolute(&disk.device) {
            out.push(Finding::error(
                path.field("device"),
                format!("disk device {:?} is not an absolute path", disk.device),
            ));
        }
        if !seen.insert(disk.device.as_str()) {
            out.push(Finding::error(
                path.field("device"),
                format!("disk device {:?} is listed more than once", disk.device),
            ));
        }

        let mut numbers = HashSet::new();
        for (j, part) in disk.partitions.iter().enumerate() {
            let part_path = path.field("partitions").at(j);
            // 0 means "next free number" and may repeat.
            if part.number != 0 && !numbers.insert(part.number) {
                out.push(Finding::error(
                    part_path.field("number"),
                    format!("partition number {} is used more than once", part.number),
                ));
            }
            if let Some(label) = &part.label {
                if label.chars().count() > MAX_PARTITION_LABEL {
                    out.push(Finding::error(
                        part_path.field("label"),
                        format!("partition label exceeds {MAX_PARTITION_LABEL} characters"),
                    ));
                }
            }
            if let Some(guid) = &part.type_guid {
                if !is_guid(guid) {
                    out.push(Finding::error(
                        part_path.field("typeGuid"),
                        format!("partition type {guid:?} is not a GUID"),
                    ));
                }
            }
        }
    }
}

pub(crate) fn check_raid(arrays: &[Raid], base: &FieldPath, out: &mut Vec<Finding>) {
    for (i, raid) in arrays.iter().enumerate() {
        let path = base.at(i);
        if raid.name.is_empty() {
            out.push(Finding::error(path.field("name"), "raid array has no name"));
        }
        check_enum(&raid.level, "raid level", path.field("level"), out);
        for (k, device) in raid.devices.iter().enumerate() {
            if !is_absolute(device) {
                out.push(Finding::error(
                    path.field("devices").at(k),
                    format!("raid member {device:?} is not an absolute path"),
                ));
            }
        }
        if raid.spares > 0 && raid.level.is_valid() && !raid.level.supports_spares() {
            out.push(Finding::error(
                path.field("spares"),
                format!("raid level {:?} does not support spares", raid.level.as_str()),
            ));
        }
    }
}

pub(crate) fn check_systemd_units(units: &[SystemdUnit], base: &FieldPath, out: &mut Vec<Finding>) {
    for (i, unit) in units.iter().enumerate() {
        let path = base.at(i);
        if !SYSTEMD_UNIT_SUFFIXES.iter().any(|s| unit.name.ends_with(s)) {
            out.push(Finding::error(
                path.field("name"),
                format!("invalid systemd unit name {:?}", unit.name),
            ));
        }
        if unit.enable && unit.mask {
            out.push(Finding::warning(
                path.clone(),
                "unit is both enabled and masked; it will not start",
            ));
        }
        for (j, dropin) in unit.dropins.iter().enumerate() {
            if !dropin.name.ends_with(".conf") {
                out.push(Finding::error(
                    path.field("dropins").at(j).field("name"),
                    format!("invalid dropin name {:?}; must end in .conf", dropin.name),
                ));
            }
        }
    }
}

pub(crate) fn check_networkd_units(
    units: &[NetworkdUnit],
    base: &FieldPath,
    out: &mut Vec<Finding>,
) {
    for (i, unit) in units.iter().enumerate() {
        if !NETWORKD_UNIT_SUFFIXES.iter().any(|s| unit.name.ends_with(s)) {
            out.push(Finding::error(
                base.at(i).field("name"),
                format!("invalid networkd unit name {:?}", unit.name),
            ));
        }
    }
}

pub(crate) fn check_passwd(passwd: &Passwd, base: &FieldPath, out: &mut Vec<Finding>) {
    let mut names = HashSet::new();
    for (i, user) in passwd.users.iter().enumerate() {
        let path = base.field("users").at(i);
        if user.name.is_empty() {
            out.push(Finding::error(path.field("name"), "user has no name"));
        } else if !names.insert(user.name.as_str()) {
            out.push(Finding::warning(
                path.field("name"),
                format!("user {:?} is defined more than once", user.name),
            ));
        }
        if let Some(create) = &user.create {
            if create.no_create_home && create.home_dir.is_some() {
                out.push(Finding::warning(
                    path.field("create").field("homeDir"),
                    "homeDir is ignored when noCreateHome is set",
                ));
            }
        }
    }
    for (i, group) in passwd.groups.iter().enumerate() {
        if group.name.is_empty() {
            out.push(Finding::error(
                base.field("groups").at(i).field("name"),
                "group has no name",
            ));
        }
    }
}

/// Reported when a file mode carries bits beyond the permission bits.
pub(crate) fn check_mode(mode: u32, path: FieldPath, out: &mut Vec<Finding>) {
    if mode > MAX_FILE_MODE {
        out.push(Finding::error(
            path,
            format!("file mode {mode:#o} exceeds {MAX_FILE_MODE:#o}"),
        ));
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────

/// `ignition.config.append` / `replace` must point somewhere fetchable.
pub struct ConfigReferencesRule;

impl Rule for ConfigReferencesRule {
    fn name(&self) -> &'static str {
        "config-references"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("ignition").field("config");
        for (i, reference) in config.ignition.config.append.iter().enumerate() {
            check_reference(reference, base.field("append").at(i), out);
        }
        if let Some(reference) = &config.ignition.config.replace {
            check_reference(reference, base.field("replace"), out);
        }
    }
}

pub struct DisksRule;

impl Rule for DisksRule {
    fn name(&self) -> &'static str {
        "disks"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("storage").field("disks");
        check_disks(&config.storage.disks, &base, out);
    }
}

pub struct RaidRule;

impl Rule for RaidRule {
    fn name(&self) -> &'static str {
        "raid"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("storage").field("raid");
        check_raid(&config.storage.raid, &base, out);
    }
}

pub struct FilesystemsRule;

impl Rule for FilesystemsRule {
    fn name(&self) -> &'static str {
        "filesystems"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("storage").field("filesystems");
        let mut names = HashSet::new();
        for (i, fs) in config.storage.filesystems.iter().enumerate() {
            let path = base.at(i);
            if !fs.name.is_empty() && !names.insert(fs.name.as_str()) {
                out.push(Finding::error(
                    path.field("name"),
                    format!("filesystem name {:?} is used more than once", fs.name),
                ));
            }
            match (&fs.mount, &fs.path) {
                (Some(mount), None) => {
                    let mount_path = path.field("mount");
                    if !is_absolute(&mount.device) {
                        out.push(Finding::error(
                            mount_path.field("device"),
                            format!("filesystem device {:?} is not an absolute path", mount.device),
                        ));
                    }
                    check_enum(&mount.format, "filesystem format", mount_path.field("format"), out);
                }
                (None, Some(fs_path)) => {
                    if !is_absolute(fs_path) {
                        out.push(Finding::error(
                            path.field("path"),
                            format!("filesystem path {fs_path:?} is not absolute"),
                        ));
                    }
                }
                _ => out.push(Finding::error(
                    path,
                    "filesystem must specify exactly one of mount or path",
                )),
            }
        }
    }
}

pub struct FilesRule;

impl Rule for FilesRule {
    fn name(&self) -> &'static str {
        "files"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let declared: HashSet<&str> = config
            .storage
            .filesystems
            .iter()
            .map(|fs| fs.name.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        let base = FieldPath::key("storage").field("files");
        for (i, file) in config.storage.files.iter().enumerate() {
            let path = base.at(i);
            if !is_absolute(&file.path) {
                out.push(Finding::error(
                    path.field("path"),
                    format!("file path {:?} is not absolute", file.path),
                ));
            }
            if file.filesystem.is_empty() {
                out.push(Finding::error(path.field("filesystem"), "file has no filesystem"));
            } else if file.filesystem != ROOT_FILESYSTEM
                && !declared.contains(file.filesystem.as_str())
            {
                out.push(Finding::error(
                    path.field("filesystem"),
                    format!("file references undefined filesystem {:?}", file.filesystem),
                ));
            }
            let contents = path.field("contents");
            if !file.contents.source.is_empty() {
                check_url(&file.contents.source, contents.field("source"), out);
            }
            check_enum(
                &file.contents.compression,
                "compression",
                contents.field("compression"),
                out,
            );
            check_verification(&file.contents.verification, contents.field("verification"), out);
            check_mode(file.mode, path.field("mode"), out);
        }
    }
}

pub struct SystemdUnitsRule;

impl Rule for SystemdUnitsRule {
    fn name(&self) -> &'static str {
        "systemd-units"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("systemd").field("units");
        check_systemd_units(&config.systemd.units, &base, out);
    }
}

pub struct NetworkdUnitsRule;

impl Rule for NetworkdUnitsRule {
    fn name(&self) -> &'static str {
        "networkd-units"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        let base = FieldPath::key("networkd").field("units");
        check_networkd_units(&config.networkd.units, &base, out);
    }
}

pub struct PasswdRule;

impl Rule for PasswdRule {
    fn name(&self) -> &'static str {
        "passwd"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        check_passwd(&config.passwd, &FieldPath::key("passwd"), out);
    }
}

/// Informs when a config would do nothing.
pub struct EmptyConfigRule;

impl Rule for EmptyConfigRule {
    fn name(&self) -> &'static str {
        "empty-config"
    }

    fn check(&self, config: &Config, out: &mut Vec<Finding>) {
        if config.is_noop() {
            out.push(Finding::info(
                FieldPath::root(),
                "config contains no provisioning directives",
            ));
        }
    }
}

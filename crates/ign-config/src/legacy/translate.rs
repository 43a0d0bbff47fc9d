//! Mapping from the legacy schema to the current one.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ign_common::MAX_VERSION;

use super::{Config as LegacyConfig, Filesystem as LegacyFilesystem};
use crate::types::{
    Compression, Config, File, FileContents, FileOwner, Filesystem, FilesystemCreate,
    FilesystemFormat, FilesystemMount, Ignition, Storage, Verification,
};

/// Prefix of the names given to translated filesystems.
pub const TRANSLATED_FILESYSTEM_PREFIX: &str = "_translate-filesystem-";

/// Translate a legacy config into the current schema.
///
/// Total and deterministic. The i-th legacy filesystem becomes filesystem
/// `_translate-filesystem-<i>`; its inline files move to `storage.files`,
/// referencing it by name, with contents carried as a base64 `data:` URL.
pub fn translate(legacy: LegacyConfig) -> Config {
    let mut filesystems = Vec::with_capacity(legacy.storage.filesystems.len());
    let mut files = Vec::new();

    for (i, fs) in legacy.storage.filesystems.into_iter().enumerate() {
        let name = format!("{TRANSLATED_FILESYSTEM_PREFIX}{i}");
        let LegacyFilesystem {
            device,
            format,
            create,
            files: legacy_files,
        } = fs;

        files.extend(legacy_files.into_iter().map(|file| File {
            filesystem: name.clone(),
            path: file.path,
            contents: FileContents {
                compression: Compression::default(),
                source: data_url(file.contents.as_bytes()),
                verification: Verification::default(),
            },
            mode: file.mode,
            user: FileOwner { id: file.uid },
            group: FileOwner { id: file.gid },
        }));

        filesystems.push(Filesystem {
            name,
            mount: Some(FilesystemMount {
                device,
                format: FilesystemFormat(format),
                create: create.map(|c| FilesystemCreate {
                    force: c.force,
                    options: c.options,
                }),
            }),
            path: None,
        });
    }

    Config {
        ignition: Ignition {
            version: MAX_VERSION,
            ..Ignition::default()
        },
        storage: Storage {
            disks: legacy.storage.disks,
            raid: legacy.storage.raid,
            filesystems,
            files,
        },
        systemd: legacy.systemd,
        networkd: legacy.networkd,
        passwd: legacy.passwd,
    }
}

/// `data:` URL carrying `contents` verbatim.
pub fn data_url(contents: &[u8]) -> String {
    format!("data:;base64,{}", STANDARD.encode(contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{File as LegacyFile, FilesystemCreate as LegacyCreate};
    use crate::types::{Disk, EnumField, NetworkdUnit, SystemdUnit, User};

    fn sample() -> LegacyConfig {
        let mut legacy = LegacyConfig {
            ignition_version: 1,
            ..LegacyConfig::default()
        };
        legacy.storage.disks.push(Disk {
            device: "/dev/sda".to_string(),
            wipe_table: true,
            partitions: Vec::new(),
        });
        legacy.storage.filesystems = vec![
            LegacyFilesystem {
                device: "/dev/sda1".to_string(),
                format: "ext4".to_string(),
                create: Some(LegacyCreate {
                    force: true,
                    options: vec!["-L".to_string(), "DATA".to_string()],
                }),
                files: vec![LegacyFile {
                    path: "/etc/motd".to_string(),
                    contents: "hello\n".to_string(),
                    mode: 0o644,
                    uid: 500,
                    gid: 501,
                }],
            },
            LegacyFilesystem {
                device: "/dev/sdb1".to_string(),
                format: "btrfs".to_string(),
                create: None,
                files: vec![LegacyFile {
                    path: "/srv/empty".to_string(),
                    ..LegacyFile::default()
                }],
            },
        ];
        legacy.systemd.units.push(SystemdUnit {
            name: "etcd.service".to_string(),
            enable: true,
            ..SystemdUnit::default()
        });
        legacy.networkd.units.push(NetworkdUnit {
            name: "10-eth0.network".to_string(),
            contents: "[Match]\nName=eth0\n".to_string(),
        });
        legacy.passwd.users.push(User {
            name: "core".to_string(),
            ..User::default()
        });
        legacy
    }

    #[test]
    fn test_version_becomes_current() {
        let config = translate(sample());
        assert_eq!(config.ignition.version, MAX_VERSION);
    }

    #[test]
    fn test_filesystems_named_and_mounted() {
        let config = translate(sample());
        let names: Vec<_> = config.storage.filesystems.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["_translate-filesystem-0", "_translate-filesystem-1"]);
        let mount = config.storage.filesystems[0].mount.as_ref().unwrap();
        assert_eq!(mount.device, "/dev/sda1");
        assert_eq!(mount.format.as_str(), "ext4");
        assert_eq!(mount.create.as_ref().unwrap().options, ["-L", "DATA"]);
        assert!(config.storage.filesystems[1].mount.as_ref().unwrap().create.is_none());
    }

    #[test]
    fn test_files_moved_out_of_filesystems() {
        let config = translate(sample());
        assert_eq!(config.storage.files.len(), 2);
        let motd = &config.storage.files[0];
        assert_eq!(motd.filesystem, "_translate-filesystem-0");
        assert_eq!(motd.path, "/etc/motd");
        assert_eq!(motd.contents.source, "data:;base64,aGVsbG8K");
        assert_eq!(motd.mode, 0o644);
        assert_eq!((motd.user.id, motd.group.id), (500, 501));
        assert_eq!(config.storage.files[1].filesystem, "_translate-filesystem-1");
        assert_eq!(config.storage.files[1].contents.source, "data:;base64,");
    }

    #[test]
    fn test_shared_groups_carried_over() {
        let legacy = sample();
        let config = translate(legacy.clone());
        assert_eq!(config.storage.disks, legacy.storage.disks);
        assert_eq!(config.systemd, legacy.systemd);
        assert_eq!(config.networkd, legacy.networkd);
        assert_eq!(config.passwd, legacy.passwd);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(translate(sample()), translate(sample()));
    }

    #[test]
    fn test_empty_legacy() {
        let config = translate(LegacyConfig {
            ignition_version: 1,
            ..LegacyConfig::default()
        });
        assert!(config.is_noop());
    }
}

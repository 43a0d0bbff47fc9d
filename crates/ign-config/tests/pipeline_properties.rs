//! Property-based tests for pipeline invariants.

use ign_common::{resolve, ConfigError, Severity};
use ign_config::types::Config;
use ign_config::validate::validate_without_source;
use ign_config::{classify, decode, parse, sniff_version, FormatMarkers, RuleSet};
use proptest::prelude::*;
use serde_json::json;

fn legacy_file_strategy() -> impl Strategy<Value = serde_json::Value> {
    ("/[a-z]{1,8}(/[a-z]{1,8}){0,2}", ".{0,40}", 0u32..=0o7777, 0u32..2000, 0u32..2000).prop_map(
        |(path, contents, mode, uid, gid)| {
            json!({"path": path, "contents": contents, "mode": mode, "uid": uid, "gid": gid})
        },
    )
}

fn legacy_filesystem_strategy() -> impl Strategy<Value = serde_json::Value> {
    (
        "/dev/[a-z]{3}[0-9]",
        prop::sample::select(vec!["ext4", "btrfs"]),
        prop::option::of(any::<bool>()),
        prop::collection::vec(legacy_file_strategy(), 0..4),
    )
        .prop_map(|(device, format, force, files)| {
            let mut fs = json!({"device": device, "format": format, "files": files});
            if let Some(force) = force {
                fs["create"] = json!({"force": force, "options": []});
            }
            fs
        })
}

fn legacy_document_strategy() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(legacy_filesystem_strategy(), 0..4),
        prop::collection::vec("[a-z]{1,10}", 0..4),
        prop::collection::vec(
            ("[a-z]{1,10}", prop::sample::select(vec![".service", ".timer", ".socket"])),
            0..3,
        ),
    )
        .prop_map(|(filesystems, users, units)| {
            let users: Vec<_> = users.into_iter().map(|name| json!({"name": name})).collect();
            let units: Vec<_> = units
                .into_iter()
                .map(|(stem, suffix)| json!({"name": format!("{stem}{suffix}"), "enable": true}))
                .collect();
            let doc = json!({
                "ignitionVersion": 1,
                "storage": {"filesystems": filesystems},
                "systemd": {"units": units},
                "passwd": {"users": users},
            });
            serde_json::to_vec_pretty(&doc).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn classification_is_idempotent(raw in prop::collection::vec(any::<u8>(), 0..64)) {
        let markers = FormatMarkers::default();
        prop_assert_eq!(classify(&raw, &markers), classify(&raw, &markers));
    }

    #[test]
    fn cloud_config_marker_wins_regardless_of_body(body in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut raw = b"#cloud-config\n".to_vec();
        raw.extend(body);
        let outcome = parse(&raw);
        prop_assert_eq!(outcome.error(), Some(ConfigError::ForeignFormat));
        prop_assert!(outcome.report.is_empty());
    }

    #[test]
    fn legacy_documents_translate_with_one_deprecation(raw in legacy_document_strategy()) {
        let outcome = parse(&raw);
        prop_assert!(outcome.is_ok(), "report: {}", outcome.report);
        prop_assert_eq!(outcome.report.len(), 1);
        prop_assert_eq!(outcome.report.entries[0].severity, Severity::Deprecated);
    }

    #[test]
    fn legacy_translation_adds_no_errors(raw in legacy_document_strategy()) {
        let outcome = parse(&raw);
        let config = outcome.config().expect("generated legacy document rejected");
        let report = validate_without_source(config, &RuleSet::standard());
        prop_assert_eq!(report.count(Severity::Error), 0, "report: {}", report);
    }

    #[test]
    fn decode_failures_are_positioned_by_the_resolver(raw in "\\{[ -~]{0,40}") {
        let raw = raw.into_bytes();
        prop_assume!(!sniff_version(&raw).is_some_and(|v| v.is_legacy()));
        if let Err(err) = decode::<Config>(&raw) {
            let outcome = parse(&raw);
            prop_assert_eq!(outcome.error(), Some(ConfigError::Invalid));
            prop_assert_eq!(outcome.report.len(), 1);
            prop_assert_eq!(&outcome.report.entries[0].message, err.message());
            prop_assert_eq!(
                outcome.report.entries[0].position.as_ref(),
                Some(&resolve(&raw, err.offset()))
            );
        }
    }
}

//! Best-effort schema version detection.
//!
//! Only the two version locations are decoded; everything else in the
//! document is ignored. A document that does not even get this far yields
//! `None` and is handled as current, where the full decoder reports the real
//! problem with a position.

use ign_common::SchemaVersion;
use serde::Deserialize;

#[derive(Deserialize)]
struct Probe {
    #[serde(rename = "ignitionVersion")]
    ignition_version: Option<u64>,
    ignition: Option<IgnitionProbe>,
}

#[derive(Deserialize)]
struct IgnitionProbe {
    version: Option<SchemaVersion>,
}

/// Sniff the schema version of `raw`.
///
/// The legacy top-level `ignitionVersion` integer is checked first, then
/// the current `ignition.version` object. Returns `None` when neither is
/// present, the probe decode fails, or the version is `0.0`.
pub fn sniff_version(raw: &[u8]) -> Option<SchemaVersion> {
    let probe: Probe = serde_json::from_slice(raw).ok()?;
    let version = match (probe.ignition_version, probe.ignition) {
        (Some(major), _) => SchemaVersion::new(major, 0),
        (None, Some(IgnitionProbe { version: Some(v) })) => v,
        _ => return None,
    };
    (!version.is_unspecified()).then_some(version)
}

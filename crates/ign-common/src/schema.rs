//! Schema versioning and compatibility.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Major version of the deprecated schema that is still accepted via
/// translation.
pub const LEGACY_MAJOR: u64 = 1;

/// Major version of the schema decoded natively.
pub const CURRENT_MAJOR: u64 = 2;

/// Newest version this crate understands.
pub const MAX_VERSION: SchemaVersion = SchemaVersion {
    major: CURRENT_MAJOR,
    minor: 0,
};

/// A `(major, minor)` schema version.
///
/// Ordering is lexicographic on `(major, minor)`. `0.0` is the
/// "unspecified" sentinel.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub struct SchemaVersion {
    #[serde(default)]
    pub major: u64,
    #[serde(default)]
    pub minor: u64,
}

/// Version outside the accepted current range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("config version {found} is too old; version {max} is required")]
    TooOld { found: SchemaVersion, max: SchemaVersion },

    #[error("config version {found} is too new; the newest supported version is {max}")]
    TooNew { found: SchemaVersion, max: SchemaVersion },
}

impl SchemaVersion {
    pub const UNSPECIFIED: SchemaVersion = SchemaVersion { major: 0, minor: 0 };

    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }

    pub fn is_legacy(&self) -> bool {
        self.major == LEGACY_MAJOR
    }

    /// Check the version against the accepted current range.
    pub fn check_supported(&self) -> Result<(), VersionError> {
        if self.major < MAX_VERSION.major {
            return Err(VersionError::TooOld {
                found: *self,
                max: MAX_VERSION,
            });
        }
        if *self > MAX_VERSION {
            return Err(VersionError::TooNew {
                found: *self,
                max: MAX_VERSION,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(SchemaVersion::new(1, 9) < SchemaVersion::new(2, 0));
        assert!(SchemaVersion::new(2, 0) < SchemaVersion::new(2, 1));
        assert!(SchemaVersion::new(3, 0) > SchemaVersion::new(2, 99));
    }

    #[test]
    fn test_unspecified_sentinel() {
        assert!(SchemaVersion::default().is_unspecified());
        assert!(!SchemaVersion::new(0, 1).is_unspecified());
    }

    #[test]
    fn test_current_version_supported() {
        assert_eq!(MAX_VERSION.check_supported(), Ok(()));
    }

    #[test]
    fn test_old_versions_rejected() {
        for v in [SchemaVersion::UNSPECIFIED, SchemaVersion::new(1, 0)] {
            assert!(matches!(
                v.check_supported(),
                Err(VersionError::TooOld { .. })
            ));
        }
    }

    #[test]
    fn test_new_versions_rejected() {
        for v in [SchemaVersion::new(2, 1), SchemaVersion::new(3, 0)] {
            assert!(matches!(
                v.check_supported(),
                Err(VersionError::TooNew { .. })
            ));
        }
    }

    #[test]
    fn test_missing_minor_defaults_to_zero() {
        let v: SchemaVersion = serde_json::from_str(r#"{"major": 2}"#).unwrap();
        assert_eq!(v, SchemaVersion::new(2, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaVersion::new(2, 0).to_string(), "2.0");
    }
}

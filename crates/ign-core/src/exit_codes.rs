//! Exit codes for ign-check.
//!
//! Exit codes communicate the verdict without requiring output parsing.
//! They are stable across releases.

use ign_config::ParseOutcome;

/// Exit codes for ign-check operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Config accepted (possibly with warnings or a deprecation notice)
    Clean = 0,

    /// Input is empty, a cloud-config or a script
    NotAConfig = 2,

    /// Config rejected
    InvalidConfig = 10,

    /// Options file unreadable or malformed
    OptionsError = 11,

    /// Input could not be read
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// The verdict for one pipeline run.
    pub fn for_outcome(outcome: &ParseOutcome) -> Self {
        match outcome.error() {
            None => ExitCode::Clean,
            Some(kind) if kind.is_not_a_config() => ExitCode::NotAConfig,
            Some(_) => ExitCode::InvalidConfig,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Every variant fits in a byte.
        std::process::ExitCode::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::NotAConfig.as_i32(), 2);
        assert_eq!(ExitCode::InvalidConfig.as_i32(), 10);
        assert_eq!(ExitCode::OptionsError.as_i32(), 11);
        assert_eq!(ExitCode::IoError.as_i32(), 13);
    }

    #[test]
    fn test_not_a_config_is_not_an_error() {
        assert!(!ExitCode::NotAConfig.is_error());
        assert!(!ExitCode::NotAConfig.is_success());
        assert!(ExitCode::InvalidConfig.is_error());
    }

    #[test]
    fn test_for_outcome() {
        assert_eq!(ExitCode::for_outcome(&ign_config::parse(b"")), ExitCode::NotAConfig);
        assert_eq!(
            ExitCode::for_outcome(&ign_config::parse(br#"{"ignitionVersion": 1}"#)),
            ExitCode::Clean
        );
        assert_eq!(ExitCode::for_outcome(&ign_config::parse(b"{")), ExitCode::InvalidConfig);
    }
}

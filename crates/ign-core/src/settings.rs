//! Parser options resolution (CLI → env → XDG → defaults).

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use ign_config::{OptionsError, ParserOptions};
use tracing::debug;

/// Environment variable naming an options file.
pub const OPTIONS_ENV: &str = "IGN_CHECK_OPTIONS";

/// Directory under the user config dir holding ign-check files.
pub const CONFIG_DIR_NAME: &str = "ign-check";

pub const OPTIONS_FILE_NAME: &str = "options.json";

/// Where the effective options came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    Flag(PathBuf),
    Env(PathBuf),
    UserConfig(PathBuf),
    Defaults,
}

impl OptionsSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            OptionsSource::Flag(p) | OptionsSource::Env(p) | OptionsSource::UserConfig(p) => {
                Some(p)
            }
            OptionsSource::Defaults => None,
        }
    }
}

impl fmt::Display for OptionsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsSource::Flag(p) => write!(f, "--options {}", p.display()),
            OptionsSource::Env(p) => write!(f, "${OPTIONS_ENV} {}", p.display()),
            OptionsSource::UserConfig(p) => write!(f, "user config {}", p.display()),
            OptionsSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Pick the options file.
///
/// An explicit flag or environment value is used even when the file does
/// not exist, so the mistake surfaces as an error. The user config file is
/// only used when present.
pub fn locate(
    flag: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> OptionsSource {
    if let Some(path) = flag {
        return OptionsSource::Flag(path.to_path_buf());
    }
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        return OptionsSource::Env(PathBuf::from(value));
    }
    if let Some(path) = config_dir.map(|dir| dir.join(CONFIG_DIR_NAME).join(OPTIONS_FILE_NAME)) {
        if path.is_file() {
            return OptionsSource::UserConfig(path);
        }
    }
    OptionsSource::Defaults
}

pub fn load(source: &OptionsSource) -> Result<ParserOptions, OptionsError> {
    match source.path() {
        Some(path) => ParserOptions::load(path),
        None => Ok(ParserOptions::default()),
    }
}

/// Resolve and load options from the process environment.
pub fn resolve_options(flag: Option<&Path>) -> Result<(OptionsSource, ParserOptions), OptionsError> {
    let source = locate(flag, std::env::var_os(OPTIONS_ENV), dirs::config_dir());
    debug!(source = %source, "resolved parser options");
    let options = load(&source)?;
    Ok((source, options))
}

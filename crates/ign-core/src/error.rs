//! Failures outside the pipeline verdict.

use ign_config::OptionsError;
use thiserror::Error;

use crate::exit_codes::ExitCode;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("cannot read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Options(_) => ExitCode::OptionsError,
            CliError::Input { .. } | CliError::Output(_) => ExitCode::IoError,
            CliError::Render(_) => ExitCode::InternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

//! ign-check: validate and translate provisioning configs from the command
//! line.
//!
//! Subcommands:
//! - `ign-check check <FILE|->`: classify, decode and validate one input
//! - `ign-check schema`: print the JSON Schema of the current config format

pub mod check;
pub mod error;
pub mod exit_codes;
pub mod output;
pub mod schema;
pub mod settings;

pub use error::CliError;
pub use exit_codes::ExitCode;
pub use output::OutputFormat;

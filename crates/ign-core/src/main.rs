//! # ign-check entry point
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! subcommand handlers. Diagnostics go to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ign_core::check::{run_check, CheckArgs};
use ign_core::schema::run_schema;
use ign_core::OutputFormat;

/// Validate and translate provisioning configs.
#[derive(Parser, Debug)]
#[command(name = "ign-check", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Parser options file (JSON).
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one config and report its diagnostics.
    Check(CheckArgs),

    /// Print the JSON Schema of the current config format.
    Schema,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ign-check starting");

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Check(args) => run_check(args, cli.format, cli.options.as_deref(), &mut stdout),
        Commands::Schema => run_schema(&mut stdout),
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code().into()
        }
    }
}

//! `ign-check check`: run the pipeline over one input.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use ign_config::Parser;
use tracing::{debug, info};

use crate::error::{CliError, Result};
use crate::exit_codes::ExitCode;
use crate::output::{render_human, render_json, OutputFormat};
use crate::settings::resolve_options;

/// Input name meaning "read standard input".
pub const STDIN: &str = "-";

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Config file to check, or `-` for standard input.
    pub input: PathBuf,

    /// Reject legacy documents instead of translating them.
    #[arg(long)]
    pub current_only: bool,

    /// Print the accepted (possibly translated) config.
    #[arg(long)]
    pub print_config: bool,
}

pub fn read_input(input: &Path) -> Result<Vec<u8>> {
    let read = if input == Path::new(STDIN) {
        let mut raw = Vec::new();
        std::io::stdin().read_to_end(&mut raw).map(|_| raw)
    } else {
        std::fs::read(input)
    };
    read.map_err(|source| CliError::Input {
        path: input.display().to_string(),
        source,
    })
}

pub fn run_check(
    args: &CheckArgs,
    format: OutputFormat,
    options_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let (source, options) = resolve_options(options_path)?;
    info!(options = %source, "loaded parser options");
    let parser = Parser::from_options(options)?;

    let raw = read_input(&args.input)?;
    debug!(bytes = raw.len(), input = %args.input.display(), "read input");

    let outcome = if args.current_only {
        parser.parse_current(&raw)
    } else {
        parser.parse(&raw)
    };
    let code = ExitCode::for_outcome(&outcome);
    info!(
        verdict = outcome.error().map_or("ok", |kind| kind.as_str()),
        entries = outcome.report.len(),
        "check finished"
    );

    let rendered = match format {
        OutputFormat::Json => render_json(&outcome, args.print_config)? + "\n",
        OutputFormat::Human => {
            let name = args.input.display().to_string();
            let name = if name == STDIN { "<stdin>" } else { name.as_str() };
            render_human(&outcome, name, args.print_config)?
        }
    };
    out.write_all(rendered.as_bytes())?;
    Ok(code)
}

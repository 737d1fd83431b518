//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod check;
mod extract;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, EmoteConfig};
use crate::diagnostics::Diagnostics;
use crate::emote::Catalog;
use crate::pipeline::extract_stylesheet;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// emotecss - Extract emote catalogs from forum skin stylesheets
#[derive(Parser)]
#[command(name = "emotecss")]
#[command(about = "Extract spritesheet and custom emotes from a stylesheet")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the emote catalog and write it as JSON
    Extract {
        /// Stylesheet to read
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extract this emote even inside an ignore region (e.g. "ajdance:hover").
        /// May be given multiple times
        #[arg(long = "extract", value_name = "EMOTE")]
        extract: Vec<String>,

        /// Config file (default: nearest emotecss.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Report diagnostics and a summary without writing a catalog
    Check {
        /// Stylesheet to read
        input: PathBuf,

        /// Extract this emote even inside an ignore region. May be given multiple times
        #[arg(long = "extract", value_name = "EMOTE")]
        extract: Vec<String>,

        /// Config file (default: nearest emotecss.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output, extract, config, strict, compact } => {
            let overrides = CliOverrides {
                extract,
                pretty: compact.then_some(false),
                strict: strict.then_some(true),
            };
            extract::run_extract(&input, output.as_deref(), config.as_deref(), &overrides)
        }
        Commands::Check { input, extract, config, strict } => {
            let overrides =
                CliOverrides { extract, pretty: None, strict: strict.then_some(true) };
            check::run_check(&input, config.as_deref(), &overrides)
        }
    }
}

/// Load the config file (explicit or discovered) and apply CLI overrides.
pub(crate) fn resolve_config(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<EmoteConfig, ExitCode> {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("Error: {}", error);
        }
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    Ok(config)
}

/// Read a stylesheet and run the extraction, printing diagnostics to stderr.
pub(crate) fn extract_file(
    input: &Path,
    config: &EmoteConfig,
) -> Result<(Catalog, Diagnostics), ExitCode> {
    let text = match std::fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    let mut diags = Diagnostics::new();
    let result = extract_stylesheet(&text, &config.extract.requested(), &mut diags);
    print_diagnostics(&diags);

    match result {
        Ok(catalog) => Ok((catalog, diags)),
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

pub(crate) fn print_diagnostics(diags: &Diagnostics) {
    for diagnostic in diags.entries() {
        eprintln!("{}", diagnostic);
    }
}

/// Exit code once extraction finished: errors always fail, warnings only in
/// strict mode.
pub(crate) fn exit_status(diags: &Diagnostics, strict: bool) -> ExitCode {
    if diags.has_errors() || (strict && diags.has_warnings()) {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

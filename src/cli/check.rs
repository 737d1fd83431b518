//! Check command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::diagnostics::Severity;

use super::{exit_status, extract_file, resolve_config};

/// Execute the check command
pub fn run_check(input: &Path, config_path: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let (catalog, diags) = match extract_file(input, &config) {
        Ok(result) => result,
        Err(code) => return code,
    };

    println!("{}", input.display());
    println!("  spritesheets:       {}", catalog.spritesheets.len());
    println!("  spritesheet emotes: {}", catalog.normal_count());
    println!("  custom emotes:      {}", catalog.custom.len());
    println!(
        "  {} error(s), {} warning(s), {} notice(s)",
        diags.count(Severity::Error),
        diags.count(Severity::Warning),
        diags.count(Severity::Notice)
    );

    exit_status(&diags, config.diagnostics.strict)
}

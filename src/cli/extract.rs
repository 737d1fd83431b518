//! Extract command implementation

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::export::{catalog_to_json, write_catalog};

use super::{exit_status, extract_file, resolve_config, EXIT_ERROR};

/// Execute the extract command
pub fn run_extract(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let (catalog, diags) = match extract_file(input, &config) {
        Ok(result) => result,
        Err(code) => return code,
    };

    let written = match output {
        Some(path) => write_catalog(&catalog, path, config.output.pretty)
            .map(|()| eprintln!("Saved: {}", path.display())),
        None => catalog_to_json(&catalog, config.output.pretty).and_then(|json| {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
            Ok(())
        }),
    };
    if let Err(e) = written {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    exit_status(&diags, config.diagnostics.strict)
}

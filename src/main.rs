//! emotecss - Command-line tool for extracting emote catalogs from stylesheets

use std::process::ExitCode;

use emotecss::cli;

fn main() -> ExitCode {
    cli::run()
}

//! cubegrid - Command-line tool for pixel grids and cube mosaic assembly guides

use std::process::ExitCode;

use cubegrid::cli;

fn main() -> ExitCode {
    cli::run()
}

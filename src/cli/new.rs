//! Blank canvas creation (`cubegrid new`)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::GridConfig;
use crate::output::{default_file_name, save_grid};
use crate::session::Session;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the new command
pub fn run_new(
    config: GridConfig,
    output: Option<&Path>,
    width: Option<usize>,
    height: Option<usize>,
    cubes: Option<&[usize]>,
) -> ExitCode {
    let scale = config.export.scale;
    let session = match cubes {
        Some(&[wide, high]) => Session::with_cubes(config, wide, high),
        Some(_) => {
            eprintln!("Error: --cubes takes exactly two values");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        None => {
            let width = width.unwrap_or(config.canvas.default_width);
            let height = height.unwrap_or(config.canvas.default_height);
            Session::new(config, width, height)
        }
    };
    let session = match session {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let grid = session.grid();
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file_name(grid.width(), grid.height())));
    if let Err(e) = save_grid(grid, session.palette(), scale, &target) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Created {}x{} canvas: {}", grid.width(), grid.height(), target.display());
    ExitCode::from(EXIT_SUCCESS)
}

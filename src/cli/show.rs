//! Terminal preview (`cubegrid show`)

use std::path::Path;
use std::process::ExitCode;

use crate::config::GridConfig;
use crate::terminal::{render_ansi_grid, render_coordinate_grid};

use super::{open_drawing, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the show command
pub fn run_show(config: GridConfig, input: &Path, cell_size: u32, coords: bool) -> ExitCode {
    let session = match open_drawing(input, config, cell_size) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot load '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let grid = session.grid();
    println!("{} ({}x{}, palette '{}')", input.display(), grid.width(), grid.height(), session.palette().name());
    println!();

    if coords {
        print!("{}", render_coordinate_grid(grid));
    } else {
        let (colored, legend) = render_ansi_grid(grid, session.palette());
        print!("{}", colored);
        print!("{}", legend);
    }
    ExitCode::from(EXIT_SUCCESS)
}

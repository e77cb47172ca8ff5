//! CLI dispatch for the `cubegrid draw` command.
//!
//! Parses the draw operations and orchestrates the draw pipeline.

use std::path::Path;
use std::process::ExitCode;

use crate::config::GridConfig;
use crate::draw::{parse_ops, DrawPipeline};
use crate::terminal::render_ansi_grid;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the draw command.
pub fn run_draw(
    config: GridConfig,
    input: &Path,
    ops: &[String],
    output: Option<&Path>,
    cell_size: u32,
    scale: Option<u32>,
    dry_run: bool,
) -> ExitCode {
    let ops = match parse_ops(ops) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut pipeline = match DrawPipeline::load(input, config, cell_size) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot load '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = pipeline.apply_ops(&ops) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    if dry_run {
        let result = pipeline.result();
        for warning in &result.warnings {
            eprintln!("Warning: {}", warning);
        }
        if !result.modified {
            println!("No changes.");
            return ExitCode::from(EXIT_SUCCESS);
        }
        let session = pipeline.session();
        let (colored, legend) = render_ansi_grid(session.grid(), session.palette());
        print!("{}", colored);
        print!("{}", legend);
        println!("{} cells would change.", result.changed_cells);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let target = output.unwrap_or(input);
    match pipeline.write_to(target, scale.unwrap_or(cell_size)) {
        Ok(result) => {
            for warning in &result.warnings {
                eprintln!("Warning: {}", warning);
            }
            eprintln!("Wrote: {} ({} cells changed)", target.display(), result.changed_cells);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

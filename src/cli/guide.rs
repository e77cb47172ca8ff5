//! Assembly guide output (`cubegrid guide`)

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use crate::config::GridConfig;
use crate::guide::{column_label, AssemblyGuide};
use crate::palette::Palette;
use crate::terminal::render_tile;

use super::{open_drawing, EXIT_ERROR, EXIT_SUCCESS};

/// Plain-text guide: build summary, cube counts, then every section's tiles.
fn format_guide(guide: &AssemblyGuide, palette: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Grid {}x{}: {}x{} tiles of {} cells, {} sections",
        guide.grid_width,
        guide.grid_height,
        guide.tile_columns,
        guide.tile_rows,
        guide.tile_size,
        guide.super_tiles.len()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Colors:");
    for color in &guide.colors {
        let _ = writeln!(out, "  {:10} {} x {}", color.name, color.hex, color.count);
    }

    for section in &guide.super_tiles {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Section {}: columns {}-{}, rows {}-{}",
            section.number,
            column_label(section.tile_cols.start),
            column_label(section.tile_cols.end - 1),
            section.tile_rows.start + 1,
            section.tile_rows.end
        );
        for tile in &section.tiles {
            out.push_str(&render_tile(tile, palette));
        }
    }
    out
}

/// Execute the guide command
pub fn run_guide(
    config: GridConfig,
    input: &Path,
    cell_size: u32,
    json: bool,
    output: Option<&Path>,
) -> ExitCode {
    let session = match open_drawing(input, config, cell_size) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot load '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let guide = match session.assembly_guide() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let text = if json {
        match guide.to_json() {
            Ok(j) => j + "\n",
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        format_guide(&guide, session.palette())
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, text) {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Wrote: {}", path.display());
        }
        None => print!("{}", text),
    }
    ExitCode::from(EXIT_SUCCESS)
}

//! Terminal rendering utilities for colored grid display
//!
//! Provides ANSI escape sequence generation for previewing grids and
//! assembly guide tiles with true-color backgrounds in terminal emulators
//! that support 24-bit color.

use std::collections::BTreeMap;

use crate::color::Rgb;
use crate::grid::Grid;
use crate::guide::Tile;
use crate::palette::{ColorId, Palette};

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

// Shown for cells whose color is missing from the palette.
const UNKNOWN_BG: &str = "\x1b[48;5;236m";

/// Convert an RGB color to an ANSI 24-bit background escape sequence.
///
/// # Examples
///
/// ```
/// use cubegrid::terminal::color_to_ansi_bg;
///
/// assert_eq!(color_to_ansi_bg([255, 0, 0]), "\x1b[48;2;255;0;0m");
/// ```
pub fn color_to_ansi_bg(rgb: Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m", rgb[0], rgb[1], rgb[2])
}

fn push_cells<'a>(output: &mut String, row: impl Iterator<Item = &'a ColorId>, palette: &Palette) {
    for &id in row {
        match palette.get(id) {
            Some(color) => output.push_str(&color_to_ansi_bg(color.rgb)),
            None => output.push_str(UNKNOWN_BG),
        }
        output.push_str("  ");
        output.push_str(ANSI_RESET);
    }
}

/// Render a grid with ANSI color backgrounds.
///
/// Returns `(colored_grid, legend)`. Every cell is a two-space block so the
/// preview keeps a roughly square aspect ratio. The legend lists each
/// palette entry used in the grid with its cell count.
pub fn render_ansi_grid(grid: &Grid, palette: &Palette) -> (String, String) {
    let mut output = String::new();
    for row in grid.rows() {
        push_cells(&mut output, row.iter(), palette);
        output.push('\n');
    }

    let counts: BTreeMap<ColorId, usize> = grid.color_counts();
    let mut legend = String::from("\nLegend:\n");
    for (id, count) in counts {
        match palette.get(id) {
            Some(color) => legend.push_str(&format!(
                "  {}  {} {:>3} {:10} ({}) x {}\n",
                color_to_ansi_bg(color.rgb),
                ANSI_RESET,
                id.to_string(),
                color.name,
                color.hex(),
                count
            )),
            None => legend.push_str(&format!("  {} unknown x {}\n", id, count)),
        }
    }

    (output, legend)
}

/// Render one assembly guide tile under a label header.
pub fn render_tile(tile: &Tile, palette: &Palette) -> String {
    let mut output = format!("{}\n", tile.label);
    for row in &tile.cells {
        push_cells(&mut output, row.iter(), palette);
        output.push('\n');
    }
    output
}

/// Render a grid as palette indexes with row/column coordinate headers.
///
/// Useful for finding the `ROW,COL` of a cell when writing draw operations.
///
/// ```text
///      0  1  2
///    ┌─────────
///  0 │ 0  0  6
///  1 │ 0  2  6
/// ```
pub fn render_coordinate_grid(grid: &Grid) -> String {
    let row_num_width = (grid.height().saturating_sub(1)).to_string().len().max(2);

    let mut output = String::new();
    output.push_str(&" ".repeat(row_num_width + 1));
    for col in 0..grid.width() {
        output.push_str(&format!("{:>2} ", col));
    }
    output.push('\n');

    output.push_str(&" ".repeat(row_num_width));
    output.push_str(" \u{250C}"); // ┌
    output.push_str(&"\u{2500}".repeat(grid.width() * 3)); // ─
    output.push('\n');

    for (row_idx, row) in grid.rows().iter().enumerate() {
        output.push_str(&format!("{:>width$} \u{2502}", row_idx, width = row_num_width)); // │
        for id in row {
            output.push_str(&format!(" {:>2}", id.index()));
        }
        output.push('\n');
    }

    output
}

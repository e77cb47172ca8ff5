//! Flood fill and connected-component queries.
//!
//! Both entry points share one traversal: an iterative depth-first walk with
//! an explicit stack over 4-connected neighbors of the same color. Because
//! they share it, a component preview always covers exactly the cells a
//! subsequent fill would repaint.

use crate::grid::{Cell, Grid, GridError};
use crate::palette::ColorId;

/// Cells of the maximal 4-connected region containing `start` whose color
/// equals the start cell's color, in visit order.
fn walk_region(grid: &Grid, start: Cell) -> Vec<Cell> {
    let (width, height) = (grid.width(), grid.height());
    let target = grid.at(start);
    let mut visited = vec![false; width * height];
    let mut region = Vec::new();
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        let idx = cell.row * width + cell.col;
        if visited[idx] || grid.at(cell) != target {
            continue;
        }
        visited[idx] = true;
        region.push(cell);

        if cell.row + 1 < height {
            stack.push(Cell::new(cell.row + 1, cell.col));
        }
        if cell.row > 0 {
            stack.push(Cell::new(cell.row - 1, cell.col));
        }
        if cell.col + 1 < width {
            stack.push(Cell::new(cell.row, cell.col + 1));
        }
        if cell.col > 0 {
            stack.push(Cell::new(cell.row, cell.col - 1));
        }
    }

    region
}

/// Same-color 4-connected component containing `start`.
pub fn connected_component(grid: &Grid, start: Cell) -> Result<Vec<Cell>, GridError> {
    grid.check_bounds(start)?;
    Ok(walk_region(grid, start))
}

/// Repaint the component containing `start` with `color`.
///
/// Returns the repainted cells. Filling a region that already has `color`
/// is a no-op and returns an empty list.
pub fn flood_fill(grid: &mut Grid, start: Cell, color: ColorId) -> Result<Vec<Cell>, GridError> {
    grid.check_bounds(start)?;
    if grid.at(start) == color {
        log::warn!("flood fill at {} with {} is a no-op (already that color)", start, color);
        return Ok(Vec::new());
    }

    let region = walk_region(grid, start);
    for &cell in &region {
        grid.put(cell, color);
    }
    log::debug!("flood fill at {} repainted {} cells", start, region.len());
    Ok(region)
}

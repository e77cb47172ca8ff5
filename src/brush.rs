//! Square brush stamping.
//!
//! A brush of size `n` covers an `n x n` block whose origin sits
//! `floor(n / 2)` cells up and left of the target cell. Parts of the stamp
//! that fall outside the grid are skipped.

use thiserror::Error;

use crate::config::BrushConfig;
use crate::grid::{Cell, Grid};
use crate::palette::ColorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrushError {
    #[error("brush size {size} is outside the allowed range {min}..={max}")]
    SizeOutOfRange { size: usize, min: usize, max: usize },
}

/// A brush size and the color it paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    size: usize,
    color: ColorId,
}

impl Brush {
    pub fn new(size: usize, color: ColorId, limits: &BrushConfig) -> Result<Self, BrushError> {
        check_size(size, limits)?;
        Ok(Self { size, color })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn color(&self) -> ColorId {
        self.color
    }

    pub fn set_color(&mut self, color: ColorId) {
        self.color = color;
    }

    pub fn set_size(&mut self, size: usize, limits: &BrushConfig) -> Result<(), BrushError> {
        check_size(size, limits)?;
        self.size = size;
        Ok(())
    }

    /// Stamp this brush onto `grid` around `center`.
    pub fn stamp(&self, grid: &mut Grid, center: Cell) -> usize {
        apply_brush(grid, center, self.size, self.color)
    }
}

fn check_size(size: usize, limits: &BrushConfig) -> Result<(), BrushError> {
    if size < limits.min_size || size > limits.max_size {
        return Err(BrushError::SizeOutOfRange { size, min: limits.min_size, max: limits.max_size });
    }
    Ok(())
}

/// In-bounds cells covered by a `size x size` stamp around `center`, row-major.
pub fn brush_footprint(
    center: Cell,
    size: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = Cell> {
    let half = (size / 2) as isize;
    let top = center.row as isize - half;
    let left = center.col as isize - half;
    (0..size as isize).flat_map(move |dr| {
        (0..size as isize).filter_map(move |dc| {
            let (r, c) = (top + dr, left + dc);
            if r >= 0 && (r as usize) < height && c >= 0 && (c as usize) < width {
                Some(Cell::new(r as usize, c as usize))
            } else {
                None
            }
        })
    })
}

/// Paint `color` into every in-bounds cell of the stamp around `center`.
///
/// Returns the number of cells written. `center` itself may lie outside
/// the grid; only the overlapping part of the stamp is painted.
pub fn apply_brush(grid: &mut Grid, center: Cell, size: usize, color: ColorId) -> usize {
    let mut written = 0;
    for cell in brush_footprint(center, size, grid.width(), grid.height()) {
        grid.put(cell, color);
        written += 1;
    }
    log::debug!("brush {} at {} wrote {} cells", size, center, written);
    written
}

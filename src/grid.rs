//! The pixel grid: a fixed-size 2D array of palette color ids.
//!
//! Cells are addressed as `(row, col)` with `(0, 0)` at the top-left and
//! stored as `cells[row][col]`. A grid's dimensions never change; resizing
//! means building a new grid.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::palette::ColorId;

/// A `(row, col)` cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Error type for grid construction and cell access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Requested size breaks the configured size rules.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions { width: usize, height: usize, reason: String },
    /// A coordinate outside the grid was passed where a valid cell is required.
    #[error("cell ({row}, {col}) out of bounds for {width}x{height} grid")]
    OutOfBounds { row: usize, col: usize, width: usize, height: usize },
    /// Rows passed to [`Grid::from_rows`] differ in length.
    #[error("row {row} has {found} cells, expected {expected} (rows must have consistent width)")]
    RaggedRows { row: usize, found: usize, expected: usize },
}

/// A rectangular grid of palette colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<ColorId>>,
}

impl Grid {
    /// Create a `width x height` grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: ColorId) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions {
                width,
                height,
                reason: "width and height must be positive".to_string(),
            });
        }
        Ok(Self { width, height, cells: vec![vec![fill; width]; height] })
    }

    /// Build a grid from explicit rows. All rows must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<ColorId>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions {
                width,
                height,
                reason: "width and height must be positive".to_string(),
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRows { row, found: r.len(), expected: width });
        }
        Ok(Self { width, height, cells: rows })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Fail with [`GridError::OutOfBounds`] unless `cell` lies inside the grid.
    pub fn check_bounds(&self, cell: Cell) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: cell.row,
                col: cell.col,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Color at `cell`, or `None` if out of bounds.
    pub fn get(&self, cell: Cell) -> Option<ColorId> {
        self.cells.get(cell.row).and_then(|r| r.get(cell.col)).copied()
    }

    /// Set the color at `cell`. Returns error if out of bounds.
    pub fn set(&mut self, cell: Cell, color: ColorId) -> Result<(), GridError> {
        self.check_bounds(cell)?;
        self.cells[cell.row][cell.col] = color;
        Ok(())
    }

    /// Unchecked read for traversals that already bounds-checked `cell`.
    pub(crate) fn at(&self, cell: Cell) -> ColorId {
        self.cells[cell.row][cell.col]
    }

    /// Unchecked write for traversals that already bounds-checked `cell`.
    pub(crate) fn put(&mut self, cell: Cell, color: ColorId) {
        self.cells[cell.row][cell.col] = color;
    }

    pub fn rows(&self) -> &[Vec<ColorId>] {
        &self.cells
    }

    /// All cells with their colors, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, ColorId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, r)| {
            r.iter().enumerate().map(move |(col, &color)| (Cell::new(row, col), color))
        })
    }

    /// Copy of the rectangle starting at `origin`, clipped to the grid.
    pub fn region(&self, origin: Cell, width: usize, height: usize) -> Vec<Vec<ColorId>> {
        let row_end = (origin.row + height).min(self.height);
        let col_end = (origin.col + width).min(self.width);
        if origin.row >= row_end || origin.col >= col_end {
            return Vec::new();
        }
        self.cells[origin.row..row_end].iter().map(|r| r[origin.col..col_end].to_vec()).collect()
    }

    /// Number of cells of each color present in the grid.
    pub fn color_counts(&self) -> BTreeMap<ColorId, usize> {
        let mut counts = BTreeMap::new();
        for (_, color) in self.cells() {
            *counts.entry(color).or_insert(0) += 1;
        }
        counts
    }

    /// Cells whose color differs from `other`. Grids of different size differ everywhere.
    pub fn diff(&self, other: &Grid) -> Vec<Cell> {
        if self.width != other.width || self.height != other.height {
            return self.cells().map(|(cell, _)| cell).collect();
        }
        self.cells().filter(|&(cell, color)| other.at(cell) != color).map(|(cell, _)| cell).collect()
    }

    /// Largest color id used, for checking a grid against a palette.
    pub fn max_color(&self) -> ColorId {
        self.cells().map(|(_, c)| c).max().unwrap_or(ColorId::new(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: ColorId = ColorId::new(0);
    const R: ColorId = ColorId::new(2);

    #[test]
    fn test_new_fills_every_cell() {
        let grid = Grid::new(4, 3, W).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.rows().len(), 3);
        assert!(grid.rows().iter().all(|r| r.len() == 4 && r.iter().all(|&c| c == W)));
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(Grid::new(0, 3, W), Err(GridError::InvalidDimensions { .. })));
        assert!(matches!(Grid::new(3, 0, W), Err(GridError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = Grid::from_rows(vec![vec![W, W, W], vec![W, W]]);
        assert_eq!(result, Err(GridError::RaggedRows { row: 1, found: 2, expected: 3 }));
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(3, 2, W).unwrap();
        grid.set(Cell::new(1, 2), R).unwrap();
        assert_eq!(grid.get(Cell::new(1, 2)), Some(R));
        assert_eq!(grid.get(Cell::new(0, 0)), Some(W));
        assert_eq!(grid.get(Cell::new(2, 0)), None);
        assert_eq!(grid.get(Cell::new(0, 3)), None);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(3, 2, W).unwrap();
        let before = grid.clone();
        let result = grid.set(Cell::new(2, 0), R);
        assert_eq!(
            result,
            Err(GridError::OutOfBounds { row: 2, col: 0, width: 3, height: 2 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = Grid::new(2, 2, W).unwrap();
        let order: Vec<Cell> = grid.cells().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_region_clips_at_edges() {
        let mut grid = Grid::new(4, 4, W).unwrap();
        grid.set(Cell::new(3, 3), R).unwrap();
        let region = grid.region(Cell::new(3, 3), 3, 3);
        assert_eq!(region, vec![vec![R]]);
        assert!(grid.region(Cell::new(4, 0), 2, 2).is_empty());
    }

    #[test]
    fn test_color_counts_and_diff() {
        let mut grid = Grid::new(3, 3, W).unwrap();
        let original = grid.clone();
        grid.set(Cell::new(0, 1), R).unwrap();
        grid.set(Cell::new(2, 2), R).unwrap();

        let counts = grid.color_counts();
        assert_eq!(counts.get(&W), Some(&7));
        assert_eq!(counts.get(&R), Some(&2));
        assert_eq!(grid.diff(&original), vec![Cell::new(0, 1), Cell::new(2, 2)]);
        assert_eq!(grid.max_color(), R);
    }
}

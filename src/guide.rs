//! Block decomposition for printable assembly guides.
//!
//! The grid is cut into `tile_size x tile_size` tiles (one physical cube face
//! each, for 3x3 cubes) and the tiles are grouped into
//! `super_tile_size x super_tile_size` super-tiles, one per printed section.
//! Tiles on the bottom and right edges are clipped when the grid size is not
//! a multiple of the tile size.
//!
//! Ordering is fixed: super-tiles row-major, tiles row-major within a
//! super-tile, cells row-major within a tile.
//!
//! Tile labels are a column name plus a 1-based row number (`A1`, `B1`, ...).
//! Column names continue past `Z` as `AA`, `AB`, ..., `AZ`, `BA`, like
//! spreadsheet columns.

use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

use crate::grid::{Cell, Grid};
use crate::palette::{ColorId, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuideError {
    #[error("tile size must be at least 1")]
    ZeroTileSize,
    #[error("super-tile size must be at least 1")]
    ZeroSuperTileSize,
}

/// Column name for a 0-based tile column index: 0 -> `A`, 25 -> `Z`, 26 -> `AA`.
pub fn column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Label for the tile at 0-based `(tile_row, tile_col)`: `B3` is column 1, row 2.
pub fn tile_label(tile_row: usize, tile_col: usize) -> String {
    format!("{}{}", column_label(tile_col), tile_row + 1)
}

/// One tile: a (possibly clipped) square block of grid cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub label: String,
    pub tile_row: usize,
    pub tile_col: usize,
    /// Top-left grid cell covered by the tile.
    pub origin: Cell,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<ColorId>>,
}

impl Tile {
    pub fn is_clipped(&self, tile_size: usize) -> bool {
        self.width < tile_size || self.height < tile_size
    }
}

/// A block of tiles rendered together as one section of the guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperTile {
    /// 1-based position in guide order.
    pub number: usize,
    /// Tile rows covered, end exclusive.
    pub tile_rows: Range<usize>,
    /// Tile columns covered, end exclusive.
    pub tile_cols: Range<usize>,
    pub tiles: Vec<Tile>,
}

/// How many cells of one palette color the build needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    pub color: ColorId,
    pub name: String,
    pub hex: String,
    pub count: usize,
}

/// Everything an external document renderer needs to lay out the guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyGuide {
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: usize,
    pub super_tile_size: usize,
    pub tile_columns: usize,
    pub tile_rows: usize,
    pub colors: Vec<ColorCount>,
    pub super_tiles: Vec<SuperTile>,
}

impl AssemblyGuide {
    /// All tiles in guide order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.super_tiles.iter().flat_map(|s| s.tiles.iter())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Split `grid` into super-tiles of tiles.
pub fn decompose(
    grid: &Grid,
    tile_size: usize,
    super_tile_size: usize,
) -> Result<Vec<SuperTile>, GuideError> {
    if tile_size == 0 {
        return Err(GuideError::ZeroTileSize);
    }
    if super_tile_size == 0 {
        return Err(GuideError::ZeroSuperTileSize);
    }

    let tile_rows = grid.height().div_ceil(tile_size);
    let tile_cols = grid.width().div_ceil(tile_size);

    let mut super_tiles = Vec::new();
    for super_row in (0..tile_rows).step_by(super_tile_size) {
        for super_col in (0..tile_cols).step_by(super_tile_size) {
            let rows = super_row..(super_row + super_tile_size).min(tile_rows);
            let cols = super_col..(super_col + super_tile_size).min(tile_cols);

            let mut tiles = Vec::with_capacity(rows.len() * cols.len());
            for tile_row in rows.clone() {
                for tile_col in cols.clone() {
                    let origin = Cell::new(tile_row * tile_size, tile_col * tile_size);
                    let cells = grid.region(origin, tile_size, tile_size);
                    tiles.push(Tile {
                        label: tile_label(tile_row, tile_col),
                        tile_row,
                        tile_col,
                        origin,
                        width: cells.first().map(|r| r.len()).unwrap_or(0),
                        height: cells.len(),
                        cells,
                    });
                }
            }

            super_tiles.push(SuperTile {
                number: super_tiles.len() + 1,
                tile_rows: rows,
                tile_cols: cols,
                tiles,
            });
        }
    }

    log::debug!(
        "decomposed {}x{} grid into {}x{} tiles across {} sections",
        grid.width(),
        grid.height(),
        tile_cols,
        tile_rows,
        super_tiles.len()
    );
    Ok(super_tiles)
}

/// Decompose `grid` and attach the per-color cell counts.
pub fn assembly_guide(
    grid: &Grid,
    palette: &Palette,
    tile_size: usize,
    super_tile_size: usize,
) -> Result<AssemblyGuide, GuideError> {
    let super_tiles = decompose(grid, tile_size, super_tile_size)?;
    let counts = grid.color_counts();
    let colors = palette
        .iter()
        .filter_map(|(id, color)| {
            counts.get(&id).map(|&count| ColorCount {
                color: id,
                name: color.name.clone(),
                hex: color.hex(),
                count,
            })
        })
        .collect();

    Ok(AssemblyGuide {
        grid_width: grid.width(),
        grid_height: grid.height(),
        tile_size,
        super_tile_size,
        tile_columns: grid.width().div_ceil(tile_size),
        tile_rows: grid.height().div_ceil(tile_size),
        colors,
        super_tiles,
    })
}

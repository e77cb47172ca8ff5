//! cubegrid - Library for 8-bit pixel grids and cube mosaic guides
//!
//! This library provides functionality to:
//! - Edit fixed-palette pixel grids with a square brush, flood fill, and undo/redo
//! - Quantize images onto a palette by nearest color
//! - Decompose a grid into labeled tiles and sections for printed assembly guides
//! - Export grids as PNG and publish them to a gallery directory

pub mod brush;
pub mod cli;
pub mod color;
pub mod config;
pub mod draw;
pub mod fill;
pub mod grid;
pub mod guide;
pub mod history;
pub mod output;
pub mod palette;
pub mod palettes;
pub mod publish;
pub mod quantize;
pub mod session;
pub mod terminal;

#[cfg(feature = "wasm")]
pub mod wasm;

//! A single editing session.
//!
//! A [`Session`] owns everything one drawing needs: the configuration it was
//! opened with, the palette, the live grid, its undo history, and the brush.
//! Interactive hosts drive it the way a pointer does: `paint`/`fill` on
//! press and drag, `commit` on release.

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

use crate::brush::{brush_footprint, Brush, BrushError};
use crate::config::{GridConfig, SizeMode};
use crate::fill::{connected_component, flood_fill};
use crate::grid::{Cell, Grid, GridError};
use crate::guide::{assembly_guide, AssemblyGuide, GuideError};
use crate::history::{History, HistoryError};
use crate::output::{render_grid, OutputError};
use crate::palette::{ColorId, Palette, PaletteError};
use crate::quantize::{quantize_bitmap, quantize_image, Bitmap, QuantizeError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Brush(#[from] BrushError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Quantize(#[from] QuantizeError),
    #[error(transparent)]
    Guide(#[from] GuideError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("color {0} is not in the palette")]
    UnknownColor(ColorId),
    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

/// One independent drawing: grid, history, brush, and palette.
#[derive(Debug, Clone)]
pub struct Session {
    config: GridConfig,
    palette: Palette,
    grid: Grid,
    history: History,
    brush: Brush,
}

/// Reject configurations that would break the size or brush rules later.
fn check_config(config: &GridConfig) -> Result<(), SessionError> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    Err(SessionError::InvalidConfig(errors.into_iter().map(|e| e.to_string()).collect()))
}

impl Session {
    /// Open a blank `width x height` canvas filled with the first palette color.
    pub fn new(config: GridConfig, width: usize, height: usize) -> Result<Self, SessionError> {
        check_config(&config)?;
        config.canvas.validate_dimensions(width, height)?;
        Self::open(config, width, height)
    }

    /// Open a canvas at the configured default size.
    pub fn with_defaults(config: GridConfig) -> Result<Self, SessionError> {
        let (width, height) = (config.canvas.default_width, config.canvas.default_height);
        Self::new(config, width, height)
    }

    /// Open a canvas sized in whole cubes, `cubes_wide x cubes_high`.
    ///
    /// The session switches to cube sizing, so later [`Session::new_canvas`]
    /// calls are checked against the cube rules as well.
    pub fn with_cubes(
        mut config: GridConfig,
        cubes_wide: usize,
        cubes_high: usize,
    ) -> Result<Self, SessionError> {
        check_config(&config)?;
        let (width, height) = config.canvas.cube_dimensions(cubes_wide, cubes_high)?;
        config.canvas.mode = SizeMode::Cubes;
        config.canvas.validate_dimensions(width, height)?;
        Self::open(config, width, height)
    }

    fn open(config: GridConfig, width: usize, height: usize) -> Result<Self, SessionError> {
        let palette = config.palette.build()?;
        let brush = Brush::new(config.brush.default_size, palette.first(), &config.brush)?;
        let grid = Grid::new(width, height, palette.first())?;
        let history = History::with_limit(grid.clone(), config.history.max_entries);

        log::debug!("new {}x{} session with palette '{}'", width, height, palette.name());
        Ok(Self { config, palette, grid, history, brush })
    }

    /// Replace the canvas with a blank one and start a fresh history.
    pub fn new_canvas(&mut self, width: usize, height: usize) -> Result<(), SessionError> {
        self.config.canvas.validate_dimensions(width, height)?;
        self.grid = Grid::new(width, height, self.palette.first())?;
        self.history.reset(self.grid.clone());
        Ok(())
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn select_color(&mut self, color: ColorId) -> Result<(), SessionError> {
        if !self.palette.contains(color) {
            return Err(SessionError::UnknownColor(color));
        }
        self.brush.set_color(color);
        Ok(())
    }

    /// Select a color by entry name or color string; returns the chosen entry.
    pub fn select_color_named(&mut self, text: &str) -> Result<ColorId, SessionError> {
        let color = self.palette.resolve(text)?;
        self.brush.set_color(color);
        Ok(color)
    }

    pub fn set_brush_size(&mut self, size: usize) -> Result<(), SessionError> {
        self.brush.set_size(size, &self.config.brush)?;
        Ok(())
    }

    /// Stamp the brush at `cell`. The stroke stays uncommitted until [`commit`](Self::commit).
    pub fn paint(&mut self, cell: Cell) -> usize {
        self.brush.stamp(&mut self.grid, cell)
    }

    /// Flood fill from `cell` with the brush color; returns the repainted cells.
    pub fn fill(&mut self, cell: Cell) -> Result<Vec<Cell>, SessionError> {
        Ok(flood_fill(&mut self.grid, cell, self.brush.color())?)
    }

    /// Snapshot the grid into history. Returns `false` when nothing changed
    /// since the current snapshot.
    pub fn commit(&mut self) -> bool {
        if self.grid == *self.history.current() {
            return false;
        }
        self.history.commit(&self.grid);
        true
    }

    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.grid = self.history.undo()?.clone();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), SessionError> {
        self.grid = self.history.redo()?.clone();
        Ok(())
    }

    /// Cells a fill at `cell` would repaint.
    pub fn highlight(&self, cell: Cell) -> Result<Vec<Cell>, SessionError> {
        Ok(connected_component(&self.grid, cell)?)
    }

    /// Cells the brush would cover at `cell`.
    pub fn brush_preview(&self, cell: Cell) -> Vec<Cell> {
        brush_footprint(cell, self.brush.size(), self.grid.width(), self.grid.height()).collect()
    }

    /// Quantize a bitmap onto the current canvas size and start a fresh history.
    pub fn import_bitmap(&mut self, bitmap: &Bitmap<'_>) -> Result<(), SessionError> {
        let grid = quantize_bitmap(bitmap, self.grid.width(), self.grid.height(), &self.palette)?;
        self.replace(grid);
        Ok(())
    }

    /// Quantize a decoded image onto the current canvas size.
    pub fn import_resized(&mut self, image: &DynamicImage) -> Result<(), SessionError> {
        let grid = quantize_image(image, self.grid.width(), self.grid.height(), &self.palette)?;
        self.replace(grid);
        Ok(())
    }

    /// Load an image one pixel per cell, keeping its own size.
    ///
    /// Meant for images this editor exported; the size still has to satisfy
    /// the canvas rules.
    pub fn import_image(&mut self, image: &DynamicImage) -> Result<(), SessionError> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        self.config.canvas.validate_dimensions(width, height)?;
        let grid = quantize_image(image, width, height, &self.palette)?;
        self.replace(grid);
        Ok(())
    }

    /// Replace the canvas with an existing grid, such as a saved drawing,
    /// and start a fresh history.
    ///
    /// The grid must satisfy the canvas size rules and only use colors from
    /// this session's palette.
    pub fn load_grid(&mut self, grid: Grid) -> Result<(), SessionError> {
        self.config.canvas.validate_dimensions(grid.width(), grid.height())?;
        let highest = grid.max_color();
        if !self.palette.contains(highest) {
            return Err(SessionError::UnknownColor(highest));
        }
        self.replace(grid);
        Ok(())
    }

    fn replace(&mut self, grid: Grid) {
        self.grid = grid;
        self.history.reset(self.grid.clone());
    }

    pub fn to_image(&self) -> Result<RgbaImage, SessionError> {
        Ok(render_grid(&self.grid, &self.palette)?)
    }

    /// Assembly guide for the current grid using the configured tiling.
    pub fn assembly_guide(&self) -> Result<AssemblyGuide, SessionError> {
        Ok(assembly_guide(
            &self.grid,
            &self.palette,
            self.config.guide.tile_size,
            self.config.guide.super_tile_size,
        )?)
    }
}

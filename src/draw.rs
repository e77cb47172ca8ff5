//! Core draw pipeline: read-modify-write for exported drawings.
//!
//! Loads a PNG produced by this editor (optionally upscaled by an integer
//! cell size), maps it onto the palette, applies textual draw operations,
//! and writes the result back out.
//!
//! Operation syntax, one per `--op`:
//!
//! ```text
//! brush ROW,COL=COLOR        stamp with the current brush size
//! brush ROW,COL x SIZE=COLOR stamp with a SIZE x SIZE brush
//! fill ROW,COL=COLOR         flood fill the region under ROW,COL
//! undo
//! redo
//! ```
//!
//! `COLOR` is a palette entry name or any color string (`#F00`, `orange`).

use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::GridConfig;
use crate::grid::{Cell, Grid};
use crate::output::{save_png, scale_image, OutputError};
use crate::session::{Session, SessionError};

/// Result of writing a draw pipeline.
#[derive(Debug)]
pub struct DrawResult {
    /// Cells that differ from the loaded drawing.
    pub changed_cells: usize,
    /// Whether any modifications were made.
    pub modified: bool,
    /// Warnings encountered during processing.
    pub warnings: Vec<String>,
}

/// Error type for draw operations.
#[derive(Debug)]
pub enum DrawError {
    /// File I/O error.
    Io(std::io::Error),
    /// Input image could not be decoded.
    Image(image::ImageError),
    /// Malformed draw operation text.
    ParseError(String),
    /// Image size is not a whole number of cells.
    CellSize { width: u32, height: u32, cell_size: u32 },
    /// An operation was rejected by the session.
    Session(SessionError),
    /// Writing the result failed.
    Output(OutputError),
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::Io(e) => write!(f, "I/O error: {}", e),
            DrawError::Image(e) => write!(f, "image error: {}", e),
            DrawError::ParseError(msg) => write!(f, "parse error: {}", msg),
            DrawError::CellSize { width, height, cell_size } => write!(
                f,
                "{}x{} image is not a whole number of {}-pixel cells",
                width, height, cell_size
            ),
            DrawError::Session(e) => write!(f, "{}", e),
            DrawError::Output(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DrawError {}

impl From<std::io::Error> for DrawError {
    fn from(e: std::io::Error) -> Self {
        DrawError::Io(e)
    }
}

impl From<image::ImageError> for DrawError {
    fn from(e: image::ImageError) -> Self {
        DrawError::Image(e)
    }
}

impl From<SessionError> for DrawError {
    fn from(e: SessionError) -> Self {
        DrawError::Session(e)
    }
}

impl From<OutputError> for DrawError {
    fn from(e: OutputError) -> Self {
        DrawError::Output(e)
    }
}

/// A draw operation to apply to a drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    /// Stamp the brush: `brush 7,7x3=Black`
    Brush { cell: Cell, size: Option<usize>, color: String },
    /// Flood fill from a seed cell: `fill 0,0=Blue`
    Fill { cell: Cell, color: String },
    /// Step back one committed edit.
    Undo,
    /// Step forward one undone edit.
    Redo,
}

fn op_regex() -> &'static Regex {
    static OP: OnceLock<Regex> = OnceLock::new();
    OP.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?P<kind>brush|fill)\s+(?P<row>\d+)\s*,\s*(?P<col>\d+)\s*(?:x\s*(?P<size>\d+)\s*)?=\s*(?P<color>.+?)\s*$",
        )
        .expect("draw op pattern is valid")
    })
}

impl FromStr for DrawOp {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("undo") {
            return Ok(DrawOp::Undo);
        }
        if trimmed.eq_ignore_ascii_case("redo") {
            return Ok(DrawOp::Redo);
        }

        let caps = op_regex().captures(trimmed).ok_or_else(|| {
            DrawError::ParseError(format!(
                "invalid draw op '{}', expected 'brush R,C[xN]=COLOR', 'fill R,C=COLOR', 'undo' or 'redo'",
                trimmed
            ))
        })?;

        let number = |name: &str| -> Result<usize, DrawError> {
            caps[name]
                .parse()
                .map_err(|_| DrawError::ParseError(format!("{} out of range in '{}'", name, trimmed)))
        };
        let cell = Cell::new(number("row")?, number("col")?);
        let color = caps["color"].to_string();

        if caps["kind"].eq_ignore_ascii_case("fill") {
            if caps.name("size").is_some() {
                return Err(DrawError::ParseError(format!("fill takes no size: '{}'", trimmed)));
            }
            return Ok(DrawOp::Fill { cell, color });
        }
        let size = match caps.name("size") {
            Some(_) => Some(number("size")?),
            None => None,
        };
        Ok(DrawOp::Brush { cell, size, color })
    }
}

/// Parse a list of draw op strings, stopping at the first malformed one.
pub fn parse_ops<S: AsRef<str>>(ops: &[S]) -> Result<Vec<DrawOp>, DrawError> {
    ops.iter().map(|op| op.as_ref().parse()).collect()
}

/// The draw pipeline: holds a loaded drawing as an edit session.
pub struct DrawPipeline {
    session: Session,
    original: Grid,
    warnings: Vec<String>,
}

impl DrawPipeline {
    /// Load a PNG and prepare it for editing.
    ///
    /// `cell_size` is the upscale factor the image was exported with; each
    /// `cell_size x cell_size` block becomes one cell.
    pub fn load(path: &Path, config: GridConfig, cell_size: u32) -> Result<Self, DrawError> {
        let image = image::open(path)?;
        Self::from_image(&image, config, cell_size)
    }

    /// Prepare an already decoded image for editing.
    pub fn from_image(
        image: &image::DynamicImage,
        config: GridConfig,
        cell_size: u32,
    ) -> Result<Self, DrawError> {
        let (width, height) = (image.width(), image.height());
        if cell_size == 0 || width % cell_size != 0 || height % cell_size != 0 {
            return Err(DrawError::CellSize { width, height, cell_size });
        }

        let mut session =
            Session::new(config, (width / cell_size) as usize, (height / cell_size) as usize)?;
        session.import_resized(image)?;
        let original = session.grid().clone();
        Ok(DrawPipeline { session, original, warnings: Vec::new() })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn grid(&self) -> &Grid {
        self.session.grid()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Cells that differ from the loaded drawing.
    pub fn changed_cells(&self) -> Vec<Cell> {
        self.original.diff(self.session.grid())
    }

    /// Apply a sequence of draw operations, committing after each one.
    ///
    /// Either every operation applies or the drawing is left as it was.
    pub fn apply_ops(&mut self, ops: &[DrawOp]) -> Result<(), DrawError> {
        let mut session = self.session.clone();
        let mut warnings = Vec::new();

        for op in ops {
            match op {
                DrawOp::Brush { cell, size, color } => {
                    if let Some(size) = size {
                        session.set_brush_size(*size)?;
                    }
                    session.select_color_named(color)?;
                    if session.paint(*cell) == 0 {
                        warnings.push(format!("brush at {} does not touch the grid", cell));
                    }
                }
                DrawOp::Fill { cell, color } => {
                    session.select_color_named(color)?;
                    if session.fill(*cell)?.is_empty() {
                        warnings.push(format!("fill at {} changed nothing", cell));
                    }
                }
                DrawOp::Undo => {
                    if session.undo().is_err() {
                        warnings.push("nothing to undo".to_string());
                    }
                }
                DrawOp::Redo => {
                    if session.redo().is_err() {
                        warnings.push("nothing to redo".to_string());
                    }
                }
            }
            session.commit();
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        self.session = session;
        self.warnings.extend(warnings);
        Ok(())
    }

    /// Summarize the edits without writing anything.
    pub fn result(&self) -> DrawResult {
        let changed_cells = self.changed_cells().len();
        DrawResult { changed_cells, modified: changed_cells > 0, warnings: self.warnings.clone() }
    }

    /// Write the drawing as a PNG, `scale` pixels per cell.
    pub fn write_to(&self, path: &Path, scale: u32) -> Result<DrawResult, DrawError> {
        let image = scale_image(self.session.to_image()?, scale);
        save_png(&image, path)?;
        Ok(self.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorId;
    use image::{DynamicImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn blank(size: u32, cell_size: u32) -> DynamicImage {
        let side = size * cell_size;
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255])))
    }

    fn pipeline() -> DrawPipeline {
        DrawPipeline::from_image(&blank(15, 1), GridConfig::default(), 1).unwrap()
    }

    // ========================================================================
    // Op parsing
    // ========================================================================

    #[test]
    fn test_parse_brush_op() {
        let op: DrawOp = "brush 7,7=Black".parse().unwrap();
        assert_eq!(
            op,
            DrawOp::Brush { cell: Cell::new(7, 7), size: None, color: "Black".to_string() }
        );

        let op: DrawOp = "brush 2, 3 x4 = #FFA500".parse().unwrap();
        assert_eq!(
            op,
            DrawOp::Brush { cell: Cell::new(2, 3), size: Some(4), color: "#FFA500".to_string() }
        );
    }

    #[test]
    fn test_parse_fill_undo_redo() {
        assert_eq!(
            "FILL 0,14=rgb(0, 0, 255)".parse::<DrawOp>().unwrap(),
            DrawOp::Fill { cell: Cell::new(0, 14), color: "rgb(0, 0, 255)".to_string() }
        );
        assert_eq!("undo".parse::<DrawOp>().unwrap(), DrawOp::Undo);
        assert_eq!(" Redo ".parse::<DrawOp>().unwrap(), DrawOp::Redo);
    }

    #[test]
    fn test_parse_invalid_ops() {
        for text in ["", "brush 1=Red", "brush -1,2=Red", "fill 1,2", "fill 1,2x3=Red", "spray 1,1=Red"]
        {
            assert!(
                matches!(text.parse::<DrawOp>(), Err(DrawError::ParseError(_))),
                "'{}' parsed",
                text
            );
        }
    }

    #[test]
    fn test_parse_ops_list() {
        let ops = parse_ops(&["brush 0,0=Red", "undo"]).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(parse_ops(&["brush 0,0=Red", "oops"]).is_err());
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    #[test]
    fn test_load_with_cell_size() {
        let mut image = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        for y in 0..4 {
            for x in 56..60 {
                image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let pipeline =
            DrawPipeline::from_image(&DynamicImage::ImageRgba8(image), GridConfig::default(), 4)
                .unwrap();
        assert_eq!((pipeline.grid().width(), pipeline.grid().height()), (15, 15));
        assert_eq!(pipeline.grid().get(Cell::new(0, 14)), Some(ColorId::new(6)));
        assert_eq!(pipeline.grid().get(Cell::new(1, 14)), Some(ColorId::new(0)));
    }

    #[test]
    fn test_load_rejects_partial_cells() {
        let result = DrawPipeline::from_image(&blank(15, 1), GridConfig::default(), 2);
        assert!(matches!(result, Err(DrawError::CellSize { .. })));
        let result = DrawPipeline::from_image(&blank(15, 1), GridConfig::default(), 0);
        assert!(matches!(result, Err(DrawError::CellSize { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_canvas_size() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(16, 16));
        let result = DrawPipeline::from_image(&image, GridConfig::default(), 1);
        assert!(matches!(result, Err(DrawError::Session(_))));
    }

    #[test]
    fn test_apply_ops_commits_each() {
        let mut p = pipeline();
        let ops = parse_ops(&["brush 7,7x3=Black", "fill 0,0=Blue", "undo"]).unwrap();
        p.apply_ops(&ops).unwrap();

        // undo reverted the fill but kept the brush stroke
        assert_eq!(p.grid().get(Cell::new(0, 0)), Some(ColorId::new(0)));
        assert_eq!(p.grid().get(Cell::new(7, 7)), Some(ColorId::new(6)));
        assert_eq!(p.changed_cells().len(), 9);
        assert_eq!(p.session().history().len(), 3);
        assert!(p.session().history().can_redo());
    }

    #[test]
    fn test_apply_ops_is_atomic() {
        let mut p = pipeline();
        let ops = parse_ops(&["brush 0,0=Red", "fill 99,99=Blue"]).unwrap();
        assert!(p.apply_ops(&ops).is_err());
        assert!(p.changed_cells().is_empty());
        assert_eq!(p.session().history().len(), 1);
    }

    #[test]
    fn test_apply_ops_warnings() {
        let mut p = pipeline();
        let ops = parse_ops(&["undo", "fill 0,0=White", "brush 40,40=Red"]).unwrap();
        p.apply_ops(&ops).unwrap();
        assert_eq!(p.warnings().len(), 3);
        assert!(!p.result().modified);
    }

    #[test]
    fn test_unknown_color_rejected() {
        let mut p = pipeline();
        let ops = parse_ops(&["brush 1,1=chartreuse-ish"]).unwrap();
        assert!(matches!(p.apply_ops(&ops), Err(DrawError::Session(_))));
    }

    #[test]
    fn test_write_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.png");
        let mut p = pipeline();
        p.apply_ops(&parse_ops(&["brush 0,0=Red"]).unwrap()).unwrap();

        let result = p.write_to(&path, 3).unwrap();
        assert!(result.modified);
        assert_eq!(result.changed_cells, 1);

        let reloaded = DrawPipeline::load(&path, GridConfig::default(), 3).unwrap();
        assert_eq!(reloaded.grid(), p.grid());
    }

    #[test]
    fn test_load_file_not_found() {
        let result = DrawPipeline::load(Path::new("/nonexistent/drawing.png"), GridConfig::default(), 1);
        assert!(matches!(result, Err(DrawError::Image(_))));
    }
}

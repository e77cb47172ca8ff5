//! WASM API module for browser/JS interop
//!
//! Exposes an edit session to a browser front end. Cells cross the boundary
//! as flat `row * width + col` indexes and colors as palette indexes.

use wasm_bindgen::prelude::*;

use crate::config::loader::parse_config;
use crate::config::GridConfig;
use crate::grid::Cell;
use crate::output::{encode_png, rgb_raster};
use crate::palette::ColorId;
use crate::quantize::{Bitmap, PixelLayout};
use crate::session::Session;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A drawing session driven from JavaScript.
#[wasm_bindgen]
pub struct WasmEditor {
    session: Session,
}

impl WasmEditor {
    fn cell(&self, index: u32) -> Cell {
        let width = self.session.grid().width();
        let index = index as usize;
        Cell::new(index / width, index % width)
    }

    fn flatten(&self, cells: &[Cell]) -> Vec<u32> {
        let width = self.session.grid().width();
        cells.iter().map(|c| (c.row * width + c.col) as u32).collect()
    }
}

#[wasm_bindgen]
impl WasmEditor {
    /// Open a blank canvas with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize) -> Result<WasmEditor, JsValue> {
        let session = Session::new(GridConfig::default(), width, height).map_err(js_err)?;
        Ok(WasmEditor { session })
    }

    /// Open a blank canvas using a `cubegrid.toml` document.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(toml: &str, width: usize, height: usize) -> Result<WasmEditor, JsValue> {
        let config = parse_config(toml).map_err(js_err)?;
        let session = Session::new(config, width, height).map_err(js_err)?;
        Ok(WasmEditor { session })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.session.grid().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.session.grid().height()
    }

    /// Palette entries as `[{name, rgb}]` JSON.
    #[wasm_bindgen(js_name = paletteJson)]
    pub fn palette_json(&self) -> String {
        serde_json::to_string(self.session.palette().colors()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = newCanvas)]
    pub fn new_canvas(&mut self, width: usize, height: usize) -> Result<(), JsValue> {
        self.session.new_canvas(width, height).map_err(js_err)
    }

    #[wasm_bindgen(js_name = selectColor)]
    pub fn select_color(&mut self, index: u8) -> Result<(), JsValue> {
        self.session.select_color(ColorId::new(index)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size(&mut self, size: usize) -> Result<(), JsValue> {
        self.session.set_brush_size(size).map_err(js_err)
    }

    /// Stamp the brush at `(row, col)`; returns the cells written.
    pub fn paint(&mut self, row: usize, col: usize) -> usize {
        self.session.paint(Cell::new(row, col))
    }

    /// Flood fill at `(row, col)`; returns the repainted cell indexes.
    pub fn fill(&mut self, row: usize, col: usize) -> Result<Vec<u32>, JsValue> {
        let cells = self.session.fill(Cell::new(row, col)).map_err(js_err)?;
        Ok(self.flatten(&cells))
    }

    /// Record the current grid as an undo step (pointer release).
    pub fn commit(&mut self) -> bool {
        self.session.commit()
    }

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.session.undo().is_ok()
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.session.redo().is_ok()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.history().can_redo()
    }

    /// Indexes of the cells a fill at `(row, col)` would repaint.
    pub fn highlight(&self, row: usize, col: usize) -> Result<Vec<u32>, JsValue> {
        let cells = self.session.highlight(Cell::new(row, col)).map_err(js_err)?;
        Ok(self.flatten(&cells))
    }

    #[wasm_bindgen(js_name = brushPreview)]
    pub fn brush_preview(&self, row: usize, col: usize) -> Vec<u32> {
        self.flatten(&self.session.brush_preview(Cell::new(row, col)))
    }

    /// Palette index of the cell at flat `index`.
    #[wasm_bindgen(js_name = colorAt)]
    pub fn color_at(&self, index: u32) -> Option<u8> {
        self.session.grid().get(self.cell(index)).map(|id| id.index() as u8)
    }

    /// Every cell's palette index, row-major.
    pub fn cells(&self) -> Vec<u8> {
        self.session.grid().cells().map(|(_, id)| id.index() as u8).collect()
    }

    /// Row-major RGB bytes for drawing onto a canvas.
    pub fn rgb(&self) -> Result<Vec<u8>, JsValue> {
        rgb_raster(self.session.grid(), self.session.palette()).map_err(js_err)
    }

    /// Quantize decoded RGBA pixels onto the current canvas size.
    #[wasm_bindgen(js_name = importRgba)]
    pub fn import_rgba(&mut self, data: &[u8], width: usize, height: usize) -> Result<(), JsValue> {
        let bitmap = Bitmap::new(data, width, height, PixelLayout::Rgba).map_err(js_err)?;
        self.session.import_bitmap(&bitmap).map_err(js_err)
    }

    /// The drawing as PNG bytes, one pixel per cell.
    pub fn png(&self) -> Result<Vec<u8>, JsValue> {
        let image = self.session.to_image().map_err(js_err)?;
        encode_png(&image).map_err(js_err)
    }

    /// Assembly guide JSON for the document renderer.
    #[wasm_bindgen(js_name = guideJson)]
    pub fn guide_json(&self) -> Result<String, JsValue> {
        let guide = self.session.assembly_guide().map_err(js_err)?;
        guide.to_json().map_err(js_err)
    }
}

//! Palette quantization of arbitrary bitmaps onto a fixed-size grid.
//!
//! Resampling is an explicit nearest-neighbor pick: each target cell takes
//! the source pixel under its center, i.e. source column
//! `floor((2 * col + 1) * src_width / (2 * target_width))` and likewise for
//! rows. That pixel's RGB is then mapped to the nearest palette entry.
//! Alpha is ignored.

use image::DynamicImage;
use thiserror::Error;

use crate::grid::{Grid, GridError};
use crate::palette::{ColorId, Palette};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    #[error("source bitmap is empty ({width}x{height})")]
    EmptySource { width: usize, height: usize },
    #[error("pixel buffer holds {actual} bytes, expected {expected} for the given size and layout")]
    BufferSize { expected: usize, actual: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Channel layout of a raw pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// A borrowed, fully decoded row-major raster with 8 bits per channel.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
}

impl<'a> Bitmap<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(QuantizeError::EmptySource { width, height });
        }
        // a size too large to address can never match a real buffer
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(layout.channels()))
            .unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(QuantizeError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { data, width, height, layout })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB of the pixel at `(x, y)`; the caller keeps `x < width`, `y < height`.
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * self.layout.channels();
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Source index sampled for target index `t` when resampling `source_len` onto `target_len`.
pub fn sample_index(t: usize, target_len: usize, source_len: usize) -> usize {
    (((2 * t + 1) * source_len) / (2 * target_len)).min(source_len - 1)
}

/// Resample `bitmap` to `target_width x target_height` and map every cell
/// to its nearest palette color. The bitmap is only read.
pub fn quantize_bitmap(
    bitmap: &Bitmap<'_>,
    target_width: usize,
    target_height: usize,
    palette: &Palette,
) -> Result<Grid, QuantizeError> {
    if target_width == 0 || target_height == 0 {
        return Err(GridError::InvalidDimensions {
            width: target_width,
            height: target_height,
            reason: "width and height must be positive".to_string(),
        }
        .into());
    }

    let columns: Vec<usize> =
        (0..target_width).map(|c| sample_index(c, target_width, bitmap.width)).collect();

    let rows: Vec<Vec<ColorId>> = (0..target_height)
        .map(|r| {
            let y = sample_index(r, target_height, bitmap.height);
            columns
                .iter()
                .map(|&x| {
                    let [red, green, blue] = bitmap.rgb_at(x, y);
                    palette.nearest(red, green, blue)
                })
                .collect()
        })
        .collect();

    log::debug!(
        "quantized {}x{} bitmap to {}x{} grid with palette '{}'",
        bitmap.width,
        bitmap.height,
        target_width,
        target_height,
        palette.name()
    );
    Ok(Grid::from_rows(rows)?)
}

/// Map every pixel of `bitmap` to the palette without resampling.
pub fn map_to_palette(bitmap: &Bitmap<'_>, palette: &Palette) -> Result<Grid, QuantizeError> {
    quantize_bitmap(bitmap, bitmap.width, bitmap.height, palette)
}

/// Quantize a decoded image onto a `target_width x target_height` grid.
pub fn quantize_image(
    image: &DynamicImage,
    target_width: usize,
    target_height: usize,
    palette: &Palette,
) -> Result<Grid, QuantizeError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let bitmap = Bitmap::new(rgba.as_raw(), width as usize, height as usize, PixelLayout::Rgba)?;
    quantize_bitmap(&bitmap, target_width, target_height, palette)
}

//! Grid rasterization, PNG output and export file naming

use image::imageops::FilterType;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::io;
use std::path::Path;

use crate::grid::Grid;
use crate::palette::{ColorId, Palette};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// A grid cell refers to a color the palette does not have
    UnknownColor(ColorId),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::UnknownColor(id) => write!(f, "color {} is not in the palette", id),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::UnknownColor(_) => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

fn rgb_of(palette: &Palette, id: ColorId) -> Result<[u8; 3], OutputError> {
    palette.get(id).map(|c| c.rgb).ok_or(OutputError::UnknownColor(id))
}

/// Render a grid to an opaque image, one pixel per cell.
pub fn render_grid(grid: &Grid, palette: &Palette) -> Result<RgbaImage, OutputError> {
    let mut image = RgbaImage::new(grid.width() as u32, grid.height() as u32);
    for (cell, id) in grid.cells() {
        let [r, g, b] = rgb_of(palette, id)?;
        image.put_pixel(cell.col as u32, cell.row as u32, Rgba([r, g, b, 255]));
    }
    Ok(image)
}

/// Row-major RGB bytes, three per cell, for handing to an external encoder.
pub fn rgb_raster(grid: &Grid, palette: &Palette) -> Result<Vec<u8>, OutputError> {
    let mut raster = Vec::with_capacity(grid.width() * grid.height() * 3);
    for (_, id) in grid.cells() {
        raster.extend_from_slice(&rgb_of(palette, id)?);
    }
    Ok(raster)
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OutputError> {
    let mut png_data = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_data).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(png_data)
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    log::info!("wrote {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This keeps every cell a crisp square block.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Render, upscale, and save a grid in one step.
pub fn save_grid(grid: &Grid, palette: &Palette, scale: u32, path: &Path) -> Result<(), OutputError> {
    let image = scale_image(render_grid(grid, palette)?, scale);
    save_png(&image, path)
}

/// Default download name for a drawing: `drawing_{width}x{height}.png`.
pub fn default_file_name(width: usize, height: usize) -> String {
    format!("drawing_{}x{}.png", width, height)
}

//! Configuration schema types for `cubegrid.toml`
//!
//! Every value the editing core needs (size rules, brush limits, palette,
//! guide tiling) lives here and is handed to sessions explicitly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::grid::GridError;
use crate::palette::{Palette, PaletteError};
use crate::palettes::{builtin, DEFAULT_PALETTE};

/// How canvas dimensions are constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    /// Each side in `[min_size, max_size]` and a multiple of `step`
    #[default]
    Stepped,
    /// Each side is a whole number of cubes, `cubes * cube_size`
    Cubes,
}

/// Canvas size rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub mode: SizeMode,
    pub min_size: usize,
    pub max_size: usize,
    pub step: usize,
    /// Cells per cube side in cubes mode
    pub cube_size: usize,
    pub min_cubes: usize,
    pub max_cubes: usize,
    pub default_width: usize,
    pub default_height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            mode: SizeMode::Stepped,
            min_size: 15,
            max_size: 51,
            step: 3,
            cube_size: 3,
            min_cubes: 5,
            max_cubes: 17,
            default_width: 15,
            default_height: 15,
        }
    }
}

impl CanvasConfig {
    /// Check a requested canvas size against the active size rules.
    pub fn validate_dimensions(&self, width: usize, height: usize) -> Result<(), GridError> {
        for (side, value) in [("width", width), ("height", height)] {
            if let Err(reason) = self.check_side(value) {
                return Err(GridError::InvalidDimensions {
                    width,
                    height,
                    reason: format!("{} {}", side, reason),
                });
            }
        }
        Ok(())
    }

    fn check_side(&self, value: usize) -> Result<(), String> {
        match self.mode {
            SizeMode::Stepped => {
                if self.step == 0 {
                    return Err("cannot be checked: canvas.step is 0".to_string());
                }
                if value < self.min_size || value > self.max_size || value % self.step != 0 {
                    return Err(format!(
                        "must be between {} and {}, and a multiple of {}",
                        self.min_size, self.max_size, self.step
                    ));
                }
            }
            SizeMode::Cubes => {
                if self.cube_size == 0 {
                    return Err("cannot be checked: canvas.cube_size is 0".to_string());
                }
                let cubes = value / self.cube_size;
                if value % self.cube_size != 0 || cubes < self.min_cubes || cubes > self.max_cubes {
                    return Err(format!(
                        "must be a whole number of {}-cell cubes, between {} and {} cubes",
                        self.cube_size, self.min_cubes, self.max_cubes
                    ));
                }
            }
        }
        Ok(())
    }

    /// Grid size for a mosaic `cubes_wide x cubes_high` cubes across.
    pub fn cube_dimensions(
        &self,
        cubes_wide: usize,
        cubes_high: usize,
    ) -> Result<(usize, usize), GridError> {
        let in_range = |n: usize| n >= self.min_cubes && n <= self.max_cubes;
        let (width, height) = (cubes_wide * self.cube_size, cubes_high * self.cube_size);
        if !in_range(cubes_wide) || !in_range(cubes_high) {
            return Err(GridError::InvalidDimensions {
                width,
                height,
                reason: format!(
                    "cube count {}x{} outside {}..={}",
                    cubes_wide, cubes_high, self.min_cubes, self.max_cubes
                ),
            });
        }
        Ok((width, height))
    }
}

/// Brush size limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub min_size: usize,
    pub max_size: usize,
    pub default_size: usize,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { min_size: 1, max_size: 10, default_size: 1 }
    }
}

/// One inline palette entry: `{ name = "Red", value = "#FF0000" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub name: String,
    pub value: String,
}

/// Palette selection: a built-in by name, or an inline color list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub builtin: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ColorEntry>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { builtin: DEFAULT_PALETTE.to_string(), colors: Vec::new() }
    }
}

impl PaletteConfig {
    /// Build the configured palette. Inline colors win over `builtin`.
    pub fn build(&self) -> Result<Palette, PaletteError> {
        if self.colors.is_empty() {
            return builtin(&self.builtin);
        }
        let entries: Vec<(&str, &str)> =
            self.colors.iter().map(|c| (c.name.as_str(), c.value.as_str())).collect();
        Palette::from_entries("custom", &entries)
    }
}

/// Assembly guide tiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub tile_size: usize,
    pub super_tile_size: usize,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self { tile_size: 3, super_tile_size: 3 }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Snapshots kept; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

/// PNG export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pixels per cell in exported PNGs
    pub scale: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

/// Gallery publishing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("published") }
    }
}

/// Complete `cubegrid.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub canvas: CanvasConfig,
    pub brush: BrushConfig,
    pub palette: PaletteConfig,
    pub guide: GuideConfig,
    pub history: HistoryConfig,
    pub export: ExportConfig,
    pub publish: PublishConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "canvas.step")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cubegrid.toml: '{}' {}", self.field, self.message)
    }
}

impl GridConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        let canvas = &self.canvas;
        if canvas.step == 0 {
            push("canvas.step", "must be a positive integer".to_string());
        }
        if canvas.min_size == 0 || canvas.min_size > canvas.max_size {
            push(
                "canvas.min_size",
                format!("must be positive and not exceed max_size ({})", canvas.max_size),
            );
        }
        if canvas.cube_size == 0 {
            push("canvas.cube_size", "must be a positive integer".to_string());
        }
        if canvas.min_cubes == 0 || canvas.min_cubes > canvas.max_cubes {
            push(
                "canvas.min_cubes",
                format!("must be positive and not exceed max_cubes ({})", canvas.max_cubes),
            );
        }
        // only meaningful once the rules themselves are sane
        if canvas.step > 0 && canvas.cube_size > 0 {
            if let Err(e) = canvas.validate_dimensions(canvas.default_width, canvas.default_height) {
                push("canvas.default_width", format!("default size rejected: {}", e));
            }
        }

        let brush = &self.brush;
        if brush.min_size == 0 || brush.min_size > brush.max_size {
            push(
                "brush.min_size",
                format!("must be positive and not exceed max_size ({})", brush.max_size),
            );
        }
        if brush.default_size < brush.min_size || brush.default_size > brush.max_size {
            push(
                "brush.default_size",
                format!("must be between {} and {}", brush.min_size, brush.max_size),
            );
        }

        if let Err(e) = self.palette.build() {
            push("palette", e.to_string());
        }

        if self.guide.tile_size == 0 {
            push("guide.tile_size", "must be a positive integer".to_string());
        }
        if self.guide.super_tile_size == 0 {
            push("guide.super_tile_size", "must be a positive integer".to_string());
        }
        if self.history.max_entries == Some(0) {
            push("history.max_entries", "must keep at least one snapshot".to_string());
        }
        if self.export.scale == 0 || self.export.scale > 64 {
            push("export.scale", "must be between 1 and 64".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let errors = GridConfig::default().validate();
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_stepped_dimensions() {
        let canvas = CanvasConfig::default();
        assert!(canvas.validate_dimensions(15, 15).is_ok());
        assert!(canvas.validate_dimensions(51, 18).is_ok());
        assert!(canvas.validate_dimensions(12, 15).is_err());
        assert!(canvas.validate_dimensions(54, 15).is_err());
        match canvas.validate_dimensions(15, 16) {
            Err(GridError::InvalidDimensions { width, height, reason }) => {
                assert_eq!((width, height), (15, 16));
                assert!(reason.starts_with("height"), "got: {}", reason);
                assert!(reason.contains("multiple of 3"));
            }
            other => panic!("Expected InvalidDimensions, got: {:?}", other),
        }
    }

    #[test]
    fn test_cube_dimensions() {
        let canvas = CanvasConfig { mode: SizeMode::Cubes, ..CanvasConfig::default() };
        assert_eq!(canvas.cube_dimensions(5, 17), Ok((15, 51)));
        assert!(canvas.cube_dimensions(4, 5).is_err());
        assert!(canvas.cube_dimensions(5, 18).is_err());
        assert!(canvas.validate_dimensions(15, 51).is_ok());
        assert!(canvas.validate_dimensions(16, 51).is_err());
        assert!(canvas.validate_dimensions(12, 51).is_err());
    }

    #[test]
    fn test_zero_step_and_cube_size_report_errors() {
        let stepped = CanvasConfig { step: 0, ..CanvasConfig::default() };
        assert!(stepped.validate_dimensions(15, 15).is_err());
        let cubes = CanvasConfig { mode: SizeMode::Cubes, cube_size: 0, ..CanvasConfig::default() };
        assert!(cubes.validate_dimensions(15, 15).is_err());
    }

    #[test]
    fn test_parse_toml_sections() {
        let config: GridConfig = toml::from_str(
            r##"
            [canvas]
            mode = "cubes"
            max_cubes = 30

            [brush]
            max_size = 4

            [palette]
            colors = [
                { name = "Ink", value = "#101010" },
                { name = "Paper", value = "#F0F0F0" },
            ]

            [history]
            max_entries = 50
            "##,
        )
        .unwrap();

        assert_eq!(config.canvas.mode, SizeMode::Cubes);
        assert_eq!(config.canvas.max_cubes, 30);
        assert_eq!(config.canvas.min_cubes, 5);
        assert_eq!(config.brush.max_size, 4);
        assert_eq!(config.history.max_entries, Some(50));
        let palette = config.palette.build().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.colors()[0].name, "Ink");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut config = GridConfig::default();
        config.canvas.step = 0;
        config.brush.default_size = 20;
        config.palette.builtin = "nope".to_string();
        config.guide.tile_size = 0;

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"canvas.step".to_string()));
        assert!(fields.contains(&"brush.default_size".to_string()));
        assert!(fields.contains(&"palette".to_string()));
        assert!(fields.contains(&"guide.tile_size".to_string()));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "guide.tile_size".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "cubegrid.toml: 'guide.tile_size' must be a positive integer");
    }
}

//! Built-in palette definitions.
//!
//! `cube` matches the seven sticker colors of a standard puzzle cube and is
//! the default for new projects. The others are small classic pixel-art
//! palettes that can be selected by name in `cubegrid.toml`.

use crate::palette::{Palette, PaletteError};

/// Name of the palette used when configuration does not pick one.
pub const DEFAULT_PALETTE: &str = "cube";

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["cube", "1bit", "grayscale", "gameboy"];

const CUBE: &[(&str, &str)] = &[
    ("White", "#FFFFFF"),
    ("Yellow", "#FFFF00"),
    ("Red", "#FF0000"),
    ("Blue", "#0000FF"),
    ("Green", "#00FF00"),
    ("Orange", "#FFA500"),
    ("Black", "#000000"),
];

const ONE_BIT: &[(&str, &str)] = &[("White", "#FFFFFF"), ("Black", "#000000")];

const GRAYSCALE: &[(&str, &str)] = &[
    ("White", "#FFFFFF"),
    ("Gray1", "#DFDFDF"),
    ("Gray2", "#BFBFBF"),
    ("Gray3", "#9F9F9F"),
    ("Gray4", "#7F7F7F"),
    ("Gray5", "#5F5F5F"),
    ("Gray6", "#3F3F3F"),
    ("Black", "#000000"),
];

// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
const GAMEBOY: &[(&str, &str)] = &[
    ("Lightest", "#9BBC0F"),
    ("Light", "#8BAC0F"),
    ("Dark", "#306230"),
    ("Darkest", "#0F380F"),
];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<Palette> {
    let entries = match name {
        "cube" => CUBE,
        "1bit" => ONE_BIT,
        "grayscale" => GRAYSCALE,
        "gameboy" => GAMEBOY,
        _ => return None,
    };
    Palette::from_entries(name, entries).ok()
}

/// Like [`get_builtin`], but reports unknown names as an error.
pub fn builtin(name: &str) -> Result<Palette, PaletteError> {
    get_builtin(name).ok_or_else(|| PaletteError::UnknownBuiltin(name.to_string()))
}

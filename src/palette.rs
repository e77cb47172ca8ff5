//! Fixed, ordered color palettes and nearest-color lookup.
//!
//! A [`Palette`] is built once (from configuration or a built-in) and never
//! changes afterwards. Grids store [`ColorId`]s, which are indices into the
//! palette they were created with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{parse_color, to_hex, ColorError, Rgb};

/// Largest palette a grid may use.
pub const MAX_PALETTE_COLORS: usize = 32;

/// Index of an entry in a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(u8);

impl ColorId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ColorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub name: String,
    pub rgb: Rgb,
}

impl PaletteColor {
    pub fn new(name: impl Into<String>, rgb: Rgb) -> Self {
        Self { name: name.into(), rgb }
    }

    pub fn hex(&self) -> String {
        to_hex(self.rgb)
    }
}

/// Errors raised while building a palette or resolving a color against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette '{0}' has no colors")]
    Empty(String),
    #[error("palette '{name}' has {count} colors, at most {} are allowed", MAX_PALETTE_COLORS)]
    TooManyColors { name: String, count: usize },
    #[error("palette '{palette}' defines '{color}' more than once")]
    DuplicateName { palette: String, color: String },
    #[error("color '{name}': {source}")]
    InvalidColor {
        name: String,
        #[source]
        source: ColorError,
    },
    #[error("'{0}' is neither a palette color name nor a color value")]
    UnknownColor(String),
    #[error("unknown built-in palette '{0}'")]
    UnknownBuiltin(String),
}

/// Ordered, non-empty set of allowed colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<PaletteColor>,
}

impl Palette {
    /// Build a palette, checking it is non-empty, small, and has unique names.
    pub fn new(name: impl Into<String>, colors: Vec<PaletteColor>) -> Result<Self, PaletteError> {
        let name = name.into();
        if colors.is_empty() {
            return Err(PaletteError::Empty(name));
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(PaletteError::TooManyColors { name, count: colors.len() });
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].iter().any(|c| c.name.eq_ignore_ascii_case(&color.name)) {
                return Err(PaletteError::DuplicateName { palette: name, color: color.name.clone() });
            }
        }
        Ok(Self { name, colors })
    }

    /// Build a palette from `(name, color string)` pairs such as `("Red", "#FF0000")`.
    pub fn from_entries<N, V>(name: &str, entries: &[(N, V)]) -> Result<Self, PaletteError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let colors = entries
            .iter()
            .map(|(n, v)| {
                let (color_name, value): (&str, &str) = (n.as_ref(), v.as_ref());
                parse_color(value)
                    .map(|rgb| PaletteColor::new(color_name, rgb))
                    .map_err(|source| PaletteError::InvalidColor { name: color_name.to_string(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, colors)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    /// Iterate entries together with their ids, in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorId, &PaletteColor)> {
        self.colors.iter().enumerate().map(|(i, c)| (ColorId(i as u8), c))
    }

    pub fn get(&self, id: ColorId) -> Option<&PaletteColor> {
        self.colors.get(id.index())
    }

    pub fn contains(&self, id: ColorId) -> bool {
        id.index() < self.colors.len()
    }

    /// The first entry; new canvases are filled with it.
    pub fn first(&self) -> ColorId {
        ColorId(0)
    }

    /// Look up an entry by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<ColorId> {
        self.colors
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(|i| ColorId(i as u8))
    }

    /// Entry whose RGB value is exactly `rgb`, if any.
    pub fn exact(&self, rgb: Rgb) -> Option<ColorId> {
        self.colors.iter().position(|c| c.rgb == rgb).map(|i| ColorId(i as u8))
    }

    /// Entry closest to `(r, g, b)` by Euclidean RGB distance.
    ///
    /// Ties go to the entry that comes first in palette order, so the same
    /// input always quantizes to the same color.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> ColorId {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, color) in self.colors.iter().enumerate() {
            let dist = squared_distance([r, g, b], color.rgb);
            // strict < keeps the earliest entry on ties
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        ColorId(best as u8)
    }

    /// Resolve a user-supplied color: an entry name, or any color string
    /// accepted by [`parse_color`] mapped to the nearest entry.
    pub fn resolve(&self, text: &str) -> Result<ColorId, PaletteError> {
        if let Some(id) = self.find(text.trim()) {
            return Ok(id);
        }
        let rgb = parse_color(text).map_err(|_| PaletteError::UnknownColor(text.to_string()))?;
        Ok(self.exact(rgb).unwrap_or_else(|| self.nearest(rgb[0], rgb[1], rgb[2])))
    }
}

/// Squared Euclidean distance; orders the same as the true distance.
fn squared_distance(a: Rgb, b: Rgb) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

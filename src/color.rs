//! Color string parsing for palette definitions and CLI color arguments
//!
//! Supports the following formats:
//! - Hex: `#RGB`, `#RRGGBB` (an alpha pair in `#RGBA`/`#RRGGBBAA` is accepted and dropped)
//! - Functional: `rgb()`, `hsl()`, `hwb()`, `oklch()`
//! - Named CSS colors: `red`, `orange`, `rebeccapurple`, ...
//!
//! Grid cells are always opaque, so every parser here yields an RGB triple.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// An opaque 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid hex length (must be 3, 4, 6, or 8 digits after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into an RGB triple.
///
/// ```
/// use cubegrid::color::parse_color;
///
/// assert_eq!(parse_color("#FFA500").unwrap(), [255, 165, 0]);
/// assert_eq!(parse_color("#F00").unwrap(), [255, 0, 0]);
/// assert_eq!(parse_color("orange").unwrap(), [255, 165, 0]);
/// assert_eq!(parse_color("rgb(0, 0, 255)").unwrap(), [0, 0, 255]);
/// ```
pub fn parse_color(s: &str) -> Result<Rgb, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css_color(s),
    }
}

fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(bad));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // Short forms double each digit: #F80 -> #FF8800
        3 | 4 => Ok([digits[0] * 17, digits[1] * 17, digits[2] * 17]),
        6 | 8 => Ok([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ]),
        n => Err(ColorError::InvalidLength(n)),
    }
}

/// Value of an ASCII hex digit already checked with `is_ascii_hexdigit`.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Parse a non-hex CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgb, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok([rgba.red, rgba.green, rgba.blue]),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
            ]),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// Format an RGB triple as uppercase `#RRGGBB`.
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

//! Hex color handling for curve, rule and foreground colors.

use std::str::FromStr;

use iced_core::Color;
use palette::Srgb;

/// Fill alpha used when a curve color carries none (0x4c, about 0.3).
pub const DEFAULT_FILL_ALPHA: u8 = 0x4c;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid color: {0}")]
    Invalid(String),
}

/// Parses `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex(hex: &str) -> Result<Color, Error> {
    let (rgb, alpha) = split_alpha(hex);
    let alpha = match alpha {
        Some(alpha) => alpha?,
        None => u8::MAX,
    };
    Ok(with_alpha8(parse_rgb(rgb, hex)?, alpha))
}

/// Stroke and fill color of a curve.
///
/// A nine character color (`#rrggbbaa`) supplies its own fill alpha, any
/// other color is filled with [`DEFAULT_FILL_ALPHA`].
pub fn curve_colors(hex: &str) -> Result<(Color, Color), Error> {
    let (rgb, alpha) = split_alpha(hex);
    let alpha = match alpha {
        Some(alpha) => alpha?,
        None => DEFAULT_FILL_ALPHA,
    };
    let stroke = parse_rgb(rgb, hex)?;
    Ok((stroke, with_alpha8(stroke, alpha)))
}

pub fn invert(color: Color) -> Color {
    Color {
        r: 1.0 - color.r,
        g: 1.0 - color.g,
        b: 1.0 - color.b,
        a: color.a,
    }
}

pub fn to_hex(color: Color) -> String {
    let rgb: Srgb<u8> = Srgb::new(color.r, color.g, color.b).into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

pub fn to_css_rgba(color: Color, alpha: f32) -> String {
    let rgb: Srgb<u8> = Srgb::new(color.r, color.g, color.b).into_format();
    format!("rgba({}, {}, {}, {})", rgb.red, rgb.green, rgb.blue, alpha)
}

fn parse_rgb(rgb: &str, original: &str) -> Result<Color, Error> {
    let parsed = Srgb::<u8>::from_str(rgb).map_err(|_| Error::Invalid(original.to_string()))?;
    Ok(Color::from_rgb8(parsed.red, parsed.green, parsed.blue))
}

fn with_alpha8(color: Color, alpha: u8) -> Color {
    Color {
        a: f32::from(alpha) / 255.0,
        ..color
    }
}

fn split_alpha(hex: &str) -> (&str, Option<Result<u8, Error>>) {
    if hex.len() == 9 && hex.starts_with('#') && hex.is_char_boundary(7) {
        let (rgb, alpha) = hex.split_at(7);
        let alpha = u8::from_str_radix(alpha, 16).map_err(|_| Error::Invalid(hex.to_string()));
        (rgb, Some(alpha))
    } else {
        (hex, None)
    }
}

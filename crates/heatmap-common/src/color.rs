//! Color values used by gradient stops.
//!
//! Colors can be written in the forms commonly found in heatmap
//! configurations: CSS strings (`#rrggbb`, `rgb(0,0,255)`, `yellow`),
//! channel arrays or explicit RGBA objects.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// CSS string: hex, `rgb()`/`rgba()` or a named color
    Css(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 255 }
    }

    pub fn css(value: impl Into<String>) -> Self {
        Color::Css(value.into())
    }

    /// Resolve to straight (non-premultiplied) RGBA channels.
    pub fn to_rgba(&self) -> HeatmapResult<[u8; 4]> {
        match self {
            Color::Css(s) => parse_css_color(s),
            Color::Array(arr) => match arr.as_slice() {
                [r, g, b] => Ok([*r, *g, *b, 255]),
                [r, g, b, a] => Ok([*r, *g, *b, *a]),
                _ => Err(HeatmapError::InvalidColor(format!(
                    "expected 3 or 4 channels, got {}",
                    arr.len()
                ))),
            },
            Color::Rgba { r, g, b, a } => Ok([*r, *g, *b, *a]),
        }
    }
}

fn parse_css_color(input: &str) -> HeatmapResult<[u8; 4]> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| HeatmapError::InvalidColor(input.to_string()));
    }

    if let Some(body) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        return parse_functional(body, true).ok_or_else(|| HeatmapError::InvalidColor(input.to_string()));
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        return parse_functional(body, false).ok_or_else(|| HeatmapError::InvalidColor(input.to_string()));
    }

    named_color(&s).ok_or_else(|| HeatmapError::InvalidColor(input.to_string()))
}

fn parse_hex_color(hex: &str) -> Option<[u8; 4]> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => {
            let mut out = [0, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => None,
    }
}

/// Parse the inside of `rgb(...)` / `rgba(...)`. Alpha is a 0..1 fraction.
fn parse_functional(body: &str, with_alpha: bool) -> Option<[u8; 4]> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
    };

    let alpha = if with_alpha {
        let a: f64 = parts[3].parse().ok()?;
        if !a.is_finite() {
            return None;
        }
        (a.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };

    Some([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha])
}

fn named_color(name: &str) -> Option<[u8; 4]> {
    let rgba = match name {
        "transparent" => [0, 0, 0, 0],
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "lime" => [0, 255, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "cyan" | "aqua" => [0, 255, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255, 255],
        "orange" => [255, 165, 0, 255],
        "purple" => [128, 0, 128, 255],
        "navy" => [0, 0, 128, 255],
        "maroon" => [128, 0, 0, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        _ => return None,
    };
    Some(rgba)
}

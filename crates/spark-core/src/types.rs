//! Spatial and color types

use crate::error::SparkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D vector. Value type: every operation returns a new vector.
pub use glam::Vec2;

/// Heading of a vector in radians, 0 = +x axis, counter-clockwise positive
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rotate `v` counter-clockwise by `angle` radians
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// RGBA color, components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        write!(f, "rgba({r}, {g}, {b}, {})", self.a)
    }
}

impl FromStr for Color {
    type Err = SparkError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
    /// (channels 0-255, alpha 0-1) and a handful of color names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let invalid = || SparkError::InvalidColor(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            let digits = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
                6 | 8 => hex.to_string(),
                _ => return Err(invalid()),
            };
            let value = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
            return Ok(if digits.len() == 8 {
                Color::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)
            } else {
                Color::from_hex(value)
            });
        }

        if let Some(body) = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<f32> = body
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?;
            return match parts.as_slice() {
                [r, g, b] => Ok(Color::new(r / 255.0, g / 255.0, b / 255.0, 1.0)),
                [r, g, b, a] => Ok(Color::new(r / 255.0, g / 255.0, b / 255.0, *a)),
                _ => Err(invalid()),
            };
        }

        match text.as_str() {
            "white" => Ok(Color::WHITE),
            "black" => Ok(Color::BLACK),
            "red" => Ok(Color::RED),
            "green" => Ok(Color::GREEN),
            "blue" => Ok(Color::BLUE),
            "transparent" => Ok(Color::TRANSPARENT),
            _ => Err(invalid()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Components {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = SparkError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Text(s) => s.parse(),
            ColorRepr::Components { r, g, b, a } => Ok(Color::new(r, g, b, a)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_and_rotate() {
        assert!((heading(Vec2::new(0.0, 5.0)) - FRAC_PI_2).abs() < 1e-6);
        let r = rotate(Vec2::new(10.0, 0.0), FRAC_PI_2);
        assert!(r.x.abs() < 1e-5);
        assert!((r.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn test_color_parse_forms() {
        let short: Color = "#f80".parse().unwrap();
        assert_eq!(short, "#ff8800".parse::<Color>().unwrap());

        let with_alpha: Color = "#ff000080".parse().unwrap();
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-6);

        let rgba: Color = "rgba(255, 0, 0, 0.5)".parse().unwrap();
        assert!((rgba.r - 1.0).abs() < 1e-6);
        assert!((rgba.a - 0.5).abs() < 1e-6);

        assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
        assert!("not-a-color".parse::<Color>().is_err());
        assert!("rgb(1, 2)".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_rgba8_clamps() {
        let c = Color::new(2.0, -1.0, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }
}

//! Color types and conversion functions for the color-name index.
//!
//! Provides the device color (`Srgb`), the intermediate spaces it passes
//! through (`LinearRgb`, `Xyz`), and the perceptual space the dictionary is
//! indexed in (`Lab`, CIE L\*a\*b\* relative to D50, with its cylindrical form
//! `Lch`). All conversions are pure functions. Uses `f64` throughout.
//!
//! Every stored entry and every query goes through the same
//! [`to_index_space`] conversion, so distances between them stay comparable.

use crate::error::DictionaryError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components nominally in [0, 1].
///
/// Components outside [0, 1] are carried through unchanged; dictionary files
/// may contain channel values above 255.
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// CIE XYZ tristimulus values, with Y = 1 for the reference white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L\*a\*b\* relative to the D50 white point.
///
/// `l` spans [0, 100] for in-gamut colors; `a` and `b` stay roughly inside
/// [-115, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Cylindrical form of [`Lab`]: lightness, chroma and hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// D50 reference white, the illuminant the index space is expressed in.
const D50_WHITE: Xyz = Xyz {
    x: 0.96422,
    y: 1.0,
    z: 0.82521,
};

/// CIE constants for the L\*a\*b\* companding curve.
const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;

impl Srgb {
    /// Creates a color from 8-bit style channel values, dividing each by 255.
    ///
    /// No range check is made: `300.0` becomes `1.176...`.
    pub fn from_rgb255(r: f64, g: f64, b: f64) -> Srgb {
        Srgb {
            r: r / 255.0,
            g: g / 255.0,
            b: b / 255.0,
        }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `DictionaryError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, DictionaryError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(DictionaryError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>, label: &str| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| {
                DictionaryError::InvalidColor(format!("invalid {label} component: {e}"))
            })
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        Ok(Srgb::from_rgb255(r as f64, g as f64, b as f64))
    }

    /// Parses either a hex color (`#rrggbb`) or three channel values in 0–255
    /// separated by whitespace and/or commas (`"255 128 0"`, `"255,128,0"`).
    pub fn parse(input: &str) -> Result<Srgb, DictionaryError> {
        let trimmed = input.trim();
        if trimmed.starts_with('#') {
            return Srgb::from_hex(trimmed);
        }
        let parts: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [single] => Srgb::from_hex(single),
            [r, g, b] => {
                let channel = |s: &str| {
                    s.parse::<f64>().map_err(|e| {
                        DictionaryError::InvalidColor(format!("invalid channel {s:?}: {e}"))
                    })
                };
                Ok(Srgb::from_rgb255(channel(*r)?, channel(*g)?, channel(*b)?))
            }
            _ => Err(DictionaryError::InvalidColor(format!(
                "expected #rrggbb or three channel values, got {input:?}"
            ))),
        }
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are clamped to [0, 1] and quantized to 8-bit with rounding.
    pub fn to_hex(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts sRGB to linear RGB by applying inverse sRGB gamma.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear sRGB to XYZ under the sRGB (D65) primaries.
pub fn linear_to_xyz(c: LinearRgb) -> Xyz {
    Xyz {
        x: 0.4124564 * c.r + 0.3575761 * c.g + 0.1804375 * c.b,
        y: 0.2126729 * c.r + 0.7151522 * c.g + 0.0721750 * c.b,
        z: 0.0193339 * c.r + 0.1191920 * c.g + 0.9503041 * c.b,
    }
}

/// Bradford chromatic adaptation from D65 to D50.
pub fn adapt_d65_to_d50(c: Xyz) -> Xyz {
    Xyz {
        x: 1.0478112 * c.x + 0.0228866 * c.y - 0.0501270 * c.z,
        y: 0.0295424 * c.x + 0.9904844 * c.y - 0.0170491 * c.z,
        z: -0.0092345 * c.x + 0.0150436 * c.y + 0.7521316 * c.z,
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

/// Converts D50-relative XYZ to L\*a\*b\*.
pub fn xyz_to_lab(c: Xyz) -> Lab {
    let fx = lab_f(c.x / D50_WHITE.x);
    let fy = lab_f(c.y / D50_WHITE.y);
    let fz = lab_f(c.z / D50_WHITE.z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts L\*a\*b\* to LCh.
///
/// NaN guard: if chroma is less than 1e-10, hue is set to 0.0 to avoid
/// indeterminate `atan2(0, 0)` results.
pub fn lab_to_lch(c: Lab) -> Lch {
    let ch = (c.a * c.a + c.b * c.b).sqrt();
    let h = if ch < 1e-10 {
        0.0
    } else {
        c.b.atan2(c.a).to_degrees().rem_euclid(360.0)
    };
    Lch { l: c.l, c: ch, h }
}

/// Converts a device color into the index space: sRGB -> linear -> XYZ (D65)
/// -> XYZ (D50) -> L\*a\*b\*.
pub fn to_index_space(c: Srgb) -> Lab {
    xyz_to_lab(adapt_d65_to_d50(linear_to_xyz(srgb_to_linear(c))))
}

/// Perceptual difference between two index-space colors.
///
/// CIE94-style weighting of lightness, chroma and hue differences, with the
/// weights taken from the geometric mean chroma so that
/// `distance(a, b) == distance(b, a)`. Non-negative and zero only for equal
/// colors, but not guaranteed to satisfy the triangle inequality.
pub fn distance(a: Lab, b: Lab) -> f64 {
    let a_lch = lab_to_lch(a);
    let b_lch = lab_to_lch(b);

    let dl = b_lch.l - a_lch.l;
    let dc = b_lch.c - a_lch.c;
    let da = b.a - a.a;
    let db = b.b - a.b;
    let dh_sq = (da * da + db * db - dc * dc).max(0.0);

    let mean_c = (a_lch.c * b_lch.c).sqrt();
    let sc = 1.0 + 0.045 * mean_c;
    let sh = 1.0 + 0.015 * mean_c;

    (dl * dl + (dc / sc) * (dc / sc) + dh_sq / (sh * sh)).sqrt()
}

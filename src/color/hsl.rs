//! RGB <-> HSL conversion, hex parsing and histogram quantization.
//!
//! HSL components use the CSS ranges: hue in degrees `[0, 360)`,
//! saturation and lightness in percent `[0, 100]`. They are kept as
//! `f64` so a round trip through HSL never drifts by more than the final
//! rounding step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Histogram bucket width used when quantizing sampled pixels.
pub const QUANT_BUCKET: u8 = 32;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color in hue / saturation / lightness form.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`; the leading `#` is optional.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(input.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex(input.to_string()))
        };

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    out[i] = v * 17;
                }
                Ok(Self::new(out[0], out[1], out[2]))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(ColorParseError::InvalidHex(input.to_string())),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Floors every channel to a multiple of `bucket`.
    #[inline]
    pub fn quantize(self, bucket: u8) -> Self {
        let q = |c: u8| (c / bucket) * bucket;
        Self::new(q(self.r), q(self.g), q(self.b))
    }

    /// Difference between the largest and smallest channel.
    #[inline]
    pub fn spread(self) -> u8 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min
    }

    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: (h * 60.0) % 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl Hsl {
    #[inline]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Converts back to 8-bit RGB, rounding each channel to nearest.
    ///
    /// Out-of-range inputs are normalised first: hue wraps, saturation
    /// and lightness clamp to `[0, 100]`.
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = self.s.clamp(0.0, 100.0) / 100.0;
        let l = self.l.clamp(0.0, 100.0) / 100.0;

        if s == 0.0 {
            let v = to_byte(l);
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb::new(
            to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            to_byte(hue_to_channel(p, q, h)),
            to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(px: image::Rgb<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("Invalid hex color '{0}' — expected #rgb or #rrggbb")]
    InvalidHex(String),
}

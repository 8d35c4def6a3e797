//! Named gradient presets — static, read-only catalog.
//!
//! The special name `auto` is not a table entry; it asks for a gradient
//! derived from the screenshot itself (see `color::extract_auto_gradient`).

use super::gradient::GradientSpec;
use crate::color::Rgb;
use crate::error::ComposeError;

/// Name that selects dominant-color extraction instead of a table lookup.
pub const AUTO_PRESET: &str = "auto";

/// A named gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub colors: &'static [Rgb],
    pub angle: f64,
    pub description: &'static str,
}

impl Preset {
    pub fn to_spec(&self) -> GradientSpec {
        GradientSpec::new(self.colors.to_vec(), self.angle)
    }
}

/// Used when no background is configured at all.
pub const DEFAULT_GRADIENT: Preset = Preset {
    name: "default",
    colors: &[Rgb::new(0x66, 0x7e, 0xea), Rgb::new(0x76, 0x4b, 0xa2)],
    angle: 135.0,
    description: "Indigo to violet.",
};

static PRESETS: &[Preset] = &[
    Preset {
        name: "ocean",
        colors: &[Rgb::new(0x2e, 0x31, 0x92), Rgb::new(0x1b, 0xff, 0xff)],
        angle: 135.0,
        description: "Deep blue into cyan.",
    },
    Preset {
        name: "sunset",
        colors: &[Rgb::new(0xff, 0x7e, 0x5f), Rgb::new(0xfe, 0xb4, 0x7b)],
        angle: 135.0,
        description: "Coral into soft orange.",
    },
    Preset {
        name: "forest",
        colors: &[Rgb::new(0x13, 0x4e, 0x5e), Rgb::new(0x71, 0xb2, 0x80)],
        angle: 135.0,
        description: "Dark teal into sage.",
    },
    Preset {
        name: "lavender",
        colors: &[Rgb::new(0xa1, 0x8c, 0xd1), Rgb::new(0xfb, 0xc2, 0xeb)],
        angle: 135.0,
        description: "Lilac into pink.",
    },
    Preset {
        name: "candy",
        colors: &[Rgb::new(0xf0, 0x93, 0xfb), Rgb::new(0xf5, 0x57, 0x6c)],
        angle: 135.0,
        description: "Orchid into rose.",
    },
    Preset {
        name: "aurora",
        colors: &[
            Rgb::new(0x4f, 0xac, 0xfe),
            Rgb::new(0x00, 0xf2, 0xfe),
            Rgb::new(0x43, 0xe9, 0x7b),
        ],
        angle: 45.0,
        description: "Sky blue through cyan into green.",
    },
    Preset {
        name: "peach",
        colors: &[Rgb::new(0xff, 0xec, 0xd2), Rgb::new(0xfc, 0xb6, 0x9f)],
        angle: 90.0,
        description: "Cream into peach, top to bottom.",
    },
    Preset {
        name: "midnight",
        colors: &[Rgb::new(0x23, 0x25, 0x26), Rgb::new(0x41, 0x43, 0x45)],
        angle: 135.0,
        description: "Near-black charcoal.",
    },
    Preset {
        name: "slate",
        colors: &[Rgb::new(0x48, 0x55, 0x63), Rgb::new(0x29, 0x32, 0x3c)],
        angle: 180.0,
        description: "Blue-grey, right to left.",
    },
];

/// Every preset, in catalog order.
pub fn available_presets() -> &'static [Preset] {
    PRESETS
}

/// Preset names in catalog order.
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}

/// Case-insensitive lookup.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Resolves a preset name to its gradient, or `UnknownPreset`.
pub fn resolve_preset(name: &str) -> Result<GradientSpec, ComposeError> {
    find_preset(name)
        .map(Preset::to_spec)
        .ok_or_else(|| ComposeError::UnknownPreset {
            name: name.to_string(),
            available: preset_names(),
        })
}

//! NES system colors and the 4-color sub-palettes that tiles are decoded through.

use serde::{Deserialize, Serialize};

use crate::{
    common::{ColorIdx, PixelValue, COLORS_PER_PALETTE, SYSTEM_PALETTE_SIZE},
    error::{CodecError, CodecResult},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    const fn from_u32(c: u32) -> Self {
        Rgb {
            r: (c >> 16) as u8,
            g: (c >> 8) as u8,
            b: c as u8,
        }
    }

    /// `#RRGGBB`
    pub fn hex_string(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

// 2C02 PPU colors, 16 per row of luminance.
const SYSTEM_COLORS: [u32; SYSTEM_PALETTE_SIZE] = [
    0x7C7C7C, 0x0000FC, 0x0000BC, 0x4428BC, 0x940084, 0xA80020, 0xA81000, 0x881400,
    0x503000, 0x007800, 0x006800, 0x005800, 0x004058, 0x000000, 0x000000, 0x000000,
    0xBCBCBC, 0x0078F8, 0x0058F8, 0x6844FC, 0xD800CC, 0xE40058, 0xF83800, 0xE45C10,
    0xAC7C00, 0x00B800, 0x00A800, 0x00A844, 0x008888, 0x000000, 0x000000, 0x000000,
    0xF8F8F8, 0x3CBCFC, 0x6888FC, 0x9878F8, 0xF878F8, 0xF85898, 0xF87858, 0xFCA044,
    0xF8B800, 0xB8F818, 0x58D854, 0x58F898, 0x00E8D8, 0x787878, 0x000000, 0x000000,
    0xFCFCFC, 0xA4E4FC, 0xB8B8F8, 0xD8B8F8, 0xF8B8F8, 0xF8A4C0, 0xF0D0B0, 0xFCE0A8,
    0xF8D878, 0xD8F878, 0xB8F8B8, 0xB8F8D8, 0x00FCFC, 0xF8D8F8, 0x000000, 0x000000,
];

pub const SYSTEM_PALETTE_COLUMNS: usize = 16;

pub fn system_color(idx: ColorIdx) -> CodecResult<Rgb> {
    SYSTEM_COLORS
        .get(idx as usize)
        .map(|&c| Rgb::from_u32(c))
        .ok_or_else(|| {
            CodecError::argument(format!(
                "system color {idx:#04X} out of range (0x00-0x{:02X})",
                SYSTEM_PALETTE_SIZE - 1
            ))
        })
}

/// System color index at a position of the 16-wide palette chart.
pub fn system_index(row: usize, col: usize) -> Option<ColorIdx> {
    if col >= SYSTEM_PALETTE_COLUMNS {
        return None;
    }
    let idx = row * SYSTEM_PALETTE_COLUMNS + col;
    (idx < SYSTEM_PALETTE_SIZE).then_some(idx as ColorIdx)
}

/// Unvalidated palette as read from JSON.
#[derive(Deserialize)]
pub struct PaletteDef {
    pub name: String,
    pub colors: [ColorIdx; COLORS_PER_PALETTE],
}

/// Four system color indices; pixel value `n` is drawn with `colors[n]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteDef")]
pub struct Palette {
    name: String,
    colors: [ColorIdx; COLORS_PER_PALETTE],
    #[serde(skip)]
    rgb: [Rgb; COLORS_PER_PALETTE],
}

impl TryFrom<PaletteDef> for Palette {
    type Error = CodecError;

    fn try_from(raw: PaletteDef) -> CodecResult<Self> {
        Palette::new(&raw.name, raw.colors)
    }
}

impl Palette {
    pub fn new(name: &str, colors: [ColorIdx; COLORS_PER_PALETTE]) -> CodecResult<Self> {
        let mut rgb = [Rgb::default(); COLORS_PER_PALETTE];
        for (out, &c) in rgb.iter_mut().zip(colors.iter()) {
            *out = system_color(c)?;
        }
        Ok(Palette {
            name: name.to_string(),
            colors,
            rgb,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[ColorIdx; COLORS_PER_PALETTE] {
        &self.colors
    }

    pub fn rgb(&self, pixel: PixelValue) -> CodecResult<Rgb> {
        self.rgb.get(pixel as usize).copied().ok_or_else(|| {
            CodecError::argument(format!(
                "pixel value {pixel} has no color in palette {}",
                self.name
            ))
        })
    }

    pub fn defaults() -> Vec<Palette> {
        [
            ("Grey", [0x0F, 0x00, 0x10, 0x30]),
            ("Red", [0x0F, 0x06, 0x16, 0x26]),
            ("Green", [0x0F, 0x09, 0x19, 0x29]),
            ("Blue", [0x0F, 0x01, 0x11, 0x21]),
        ]
        .into_iter()
        .filter_map(|(name, colors)| Palette::new(name, colors).ok())
        .collect()
    }
}

//! 8x8 tiles stored as two bitplanes.
//!
//! Each row of a tile is one byte per plane, most-significant bit = leftmost column. The
//! pixel value at a position is `low_bit | (high_bit << 1)`, giving a 2-bit color index.
//! The raw (CHR) form is 16 bytes: the 8 low-plane rows followed by the 8 high-plane rows.

use std::fmt::Display;

use crate::{
    common::{PaletteIdx, PixelValue, TileIdx, BYTES_PER_TILE, PLANE_BYTES, TILE_SIZE},
    error::{CodecError, CodecResult},
    helpers::{pack_bits, unpack_bits},
    palette::{Palette, Rgb},
};

pub type PixelMatrix = [[PixelValue; TILE_SIZE]; TILE_SIZE];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    plane_low: [u8; PLANE_BYTES],
    plane_high: [u8; PLANE_BYTES],
    /// Position in the loaded pattern table; this is the byte written to the nametable.
    pub index: Option<TileIdx>,
    /// Sub-palette used when decoding for display.
    pub palette: Option<PaletteIdx>,
}

impl Tile {
    pub fn new(plane_low: [u8; PLANE_BYTES], plane_high: [u8; PLANE_BYTES]) -> Self {
        Tile {
            plane_low,
            plane_high,
            index: None,
            palette: None,
        }
    }

    pub fn with_index(mut self, index: TileIdx) -> Self {
        self.index = Some(index);
        self
    }

    /// Build a tile from rows of pixel values. Accepts anything row-like so that callers
    /// holding `Vec<Vec<u8>>` get the dimension check instead of a type error.
    pub fn from_pixel_matrix<R: AsRef<[PixelValue]>>(rows: &[R]) -> CodecResult<Self> {
        if rows.len() != TILE_SIZE {
            return Err(CodecError::dimensions("pixel matrix rows", TILE_SIZE, rows.len()));
        }
        let mut plane_low = [0; PLANE_BYTES];
        let mut plane_high = [0; PLANE_BYTES];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != TILE_SIZE {
                return Err(CodecError::dimensions("pixel matrix columns", TILE_SIZE, row.len()));
            }
            let mut low_bits = [0; TILE_SIZE];
            let mut high_bits = [0; TILE_SIZE];
            for (x, &value) in row.iter().enumerate() {
                if value > 3 {
                    return Err(CodecError::InvalidPixelValue {
                        row: y,
                        col: x,
                        value,
                    });
                }
                low_bits[x] = value & 1;
                high_bits[x] = value >> 1;
            }
            plane_low[y] = pack_bits(&low_bits);
            plane_high[y] = pack_bits(&high_bits);
        }
        Ok(Tile::new(plane_low, plane_high))
    }

    pub fn from_raw_bytes(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() != BYTES_PER_TILE {
            return Err(CodecError::dimensions("raw tile bytes", BYTES_PER_TILE, bytes.len()));
        }
        let mut tile = Tile::default();
        tile.plane_low.copy_from_slice(&bytes[..PLANE_BYTES]);
        tile.plane_high.copy_from_slice(&bytes[PLANE_BYTES..]);
        Ok(tile)
    }

    pub fn raw_bytes(&self) -> [u8; BYTES_PER_TILE] {
        let mut out = [0; BYTES_PER_TILE];
        out[..PLANE_BYTES].copy_from_slice(&self.plane_low);
        out[PLANE_BYTES..].copy_from_slice(&self.plane_high);
        out
    }

    pub fn planes(&self) -> (&[u8; PLANE_BYTES], &[u8; PLANE_BYTES]) {
        (&self.plane_low, &self.plane_high)
    }

    /// Replace both bitplanes at once.
    pub fn set_planes(&mut self, plane_low: [u8; PLANE_BYTES], plane_high: [u8; PLANE_BYTES]) {
        self.plane_low = plane_low;
        self.plane_high = plane_high;
    }

    /// `None` outside the 8x8 grid.
    pub fn pixel(&self, row: usize, col: usize) -> Option<PixelValue> {
        if row >= TILE_SIZE || col >= TILE_SIZE {
            return None;
        }
        let shift = 7 - col;
        let low = (self.plane_low[row] >> shift) & 1;
        let high = (self.plane_high[row] >> shift) & 1;
        Some(low | (high << 1))
    }

    pub fn to_pixel_matrix(&self) -> PixelMatrix {
        let mut pixels = [[0; TILE_SIZE]; TILE_SIZE];
        for (y, row) in pixels.iter_mut().enumerate() {
            let low = unpack_bits(self.plane_low[y]);
            let high = unpack_bits(self.plane_high[y]);
            for x in 0..TILE_SIZE {
                row[x] = low[x] | (high[x] << 1);
            }
        }
        pixels
    }

    /// One digit per pixel, one line per row.
    pub fn to_ascii_matrix(&self) -> String {
        self.to_pixel_matrix()
            .iter()
            .map(|row| row.iter().map(|p| char::from(b'0' + p)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The tile's own sub-palette from `palettes`, if it has one.
    pub fn display_palette<'a>(&self, palettes: &'a [Palette]) -> Option<&'a Palette> {
        self.palette.and_then(|idx| palettes.get(idx as usize))
    }

    pub fn to_rgb(&self, palette: &Palette) -> CodecResult<[[Rgb; TILE_SIZE]; TILE_SIZE]> {
        let mut out = [[Rgb::default(); TILE_SIZE]; TILE_SIZE];
        for (out_row, row) in out.iter_mut().zip(self.to_pixel_matrix()) {
            for (color, p) in out_row.iter_mut().zip(row) {
                *color = palette.rgb(p)?;
            }
        }
        Ok(out)
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_ascii_matrix())
    }
}

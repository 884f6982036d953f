//! Decoding tiles to RGBA images for preview.

use crate::{
    common::TILE_SIZE,
    error::{CodecError, CodecResult},
    helpers::alpha_blend,
    nametable::Nametable,
    palette::{system_color, system_index, Palette, Rgb, SYSTEM_PALETTE_COLUMNS},
    tile::Tile,
};

pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: usize, height: usize) -> Self {
        RgbaImage {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        let i = (y * self.width + x) * 4;
        Rgb {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
        }
    }

    pub fn put(&mut self, x: usize, y: usize, color: Rgb) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&color.to_rgba());
    }

    fn draw_tile(
        &mut self,
        tile: &Tile,
        palette: &Palette,
        x0: usize,
        y0: usize,
    ) -> CodecResult<()> {
        for (y, row) in tile.to_rgb(palette)?.iter().enumerate() {
            for (x, &color) in row.iter().enumerate() {
                self.put(x0 + x, y0 + y, color);
            }
        }
        Ok(())
    }
}

/// All tiles, `columns` per row. Tiles with their own sub-palette are drawn with it, the
/// rest with `default`.
pub fn tile_sheet(
    tiles: &[Tile],
    palettes: &[Palette],
    default: &Palette,
    columns: usize,
) -> CodecResult<RgbaImage> {
    if columns == 0 {
        return Err(CodecError::argument("tile sheet needs at least one column"));
    }
    let rows = tiles.len().div_ceil(columns).max(1);
    let mut image = RgbaImage::new(columns * TILE_SIZE, rows * TILE_SIZE);
    for (i, tile) in tiles.iter().enumerate() {
        let x0 = (i % columns) * TILE_SIZE;
        let y0 = (i / columns) * TILE_SIZE;
        let palette = tile.display_palette(palettes).unwrap_or(default);
        image.draw_tile(tile, palette, x0, y0)?;
    }
    Ok(image)
}

/// The whole screen, each tile colored by the sub-palette its block's attribute selects.
/// With `grid_alpha`, block boundaries are drawn over the image.
pub fn nametable(
    nametable: &Nametable,
    palettes: &[Palette],
    grid_alpha: Option<f32>,
) -> CodecResult<RgbaImage> {
    if let Some(alpha) = grid_alpha {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(CodecError::argument(format!("grid alpha {alpha} outside 0-1")));
        }
    }
    let screen = nametable.screen();
    let layout = nametable.layout();
    let block_width = layout.width_in_tiles();
    let mut image = RgbaImage::new(
        screen.width_in_tiles * TILE_SIZE,
        screen.height_in_tiles * TILE_SIZE,
    );

    for (i, block) in nametable.blocks().iter().enumerate() {
        let block_x = (i % nametable.blocks_per_row()) * block_width;
        let block_y = (i / nametable.blocks_per_row()) * layout.height_in_tiles();
        let visible_rows = layout.height_in_tiles().min(screen.height_in_tiles - block_y);
        for row in 0..visible_rows {
            for (col, tile) in block.tile_row(row)?.iter().enumerate() {
                let palette_idx = block.tile_palette(row * block_width + col)?;
                let palette = palettes.get(palette_idx as usize).ok_or_else(|| {
                    CodecError::argument(format!(
                        "block {i} selects palette {palette_idx}, only {} configured",
                        palettes.len()
                    ))
                })?;
                let x0 = (block_x + col) * TILE_SIZE;
                let y0 = (block_y + row) * TILE_SIZE;
                image.draw_tile(tile, palette, x0, y0)?;
            }
        }
    }

    if let Some(alpha) = grid_alpha {
        let spacing = block_width * TILE_SIZE;
        let white = Rgb { r: 255, g: 255, b: 255 };
        for y in 0..image.height {
            for x in 0..image.width {
                if x % spacing == 0 || y % spacing == 0 {
                    let blended = alpha_blend(image.get(x, y), white, alpha);
                    image.put(x, y, blended);
                }
            }
        }
    }
    Ok(image)
}

/// The 64 system colors as a 16x4 chart of `cell`-pixel squares.
pub fn system_palette(cell: usize) -> CodecResult<RgbaImage> {
    let rows = 4;
    let mut image = RgbaImage::new(SYSTEM_PALETTE_COLUMNS * cell, rows * cell);
    for y in 0..image.height {
        for x in 0..image.width {
            if let Some(idx) = system_index(y / cell, x / cell) {
                image.put(x, y, system_color(idx)?);
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attribute::Attribute,
        block::{Block, BlockLayout},
        config::ScreenConfig,
    };

    fn solid(value: u8, index: u8) -> Tile {
        Tile::from_pixel_matrix(&[[value; 8]; 8]).unwrap().with_index(index)
    }

    #[test]
    fn sheet_layout() {
        let palette = Palette::new("p", [0x0F, 0x16, 0x2A, 0x30]).unwrap();
        let tiles = vec![solid(1, 0), solid(2, 1), solid(3, 2)];
        let image = tile_sheet(&tiles, &[], &palette, 2).unwrap();
        assert_eq!((image.width, image.height), (16, 16));
        assert_eq!(image.get(0, 0), palette.rgb(1).unwrap());
        assert_eq!(image.get(8, 7), palette.rgb(2).unwrap());
        assert_eq!(image.get(3, 12), palette.rgb(3).unwrap());
        // Unused cell stays transparent.
        assert_eq!(image.data[(12 * 16 + 12) * 4 + 3], 0);
    }

    #[test]
    fn sheet_prefers_tile_palette() {
        let palettes = Palette::defaults();
        let mut tinted = solid(3, 1);
        tinted.palette = Some(2);
        let tiles = vec![solid(3, 0), tinted];
        let image = tile_sheet(&tiles, &palettes, &palettes[0], 2).unwrap();
        assert_eq!(image.get(0, 0), palettes[0].rgb(3).unwrap());
        assert_eq!(image.get(8, 0), palettes[2].rgb(3).unwrap());
    }

    #[test]
    fn nametable_uses_attribute_palettes() {
        let palettes = Palette::defaults();
        let mut nt = Nametable::new(
            BlockLayout::Quad,
            ScreenConfig {
                width_in_tiles: 4,
                height_in_tiles: 3,
            },
        )
        .unwrap();
        let block = |attr| {
            Block::new(BlockLayout::Quad, vec![solid(3, 0); 4], Attribute::simple(attr)).unwrap()
        };
        nt.set_blocks(vec![
            block(0b00_01_10_11),
            block(0),
            block(0b11_11_11_11),
            block(0),
        ])
        .unwrap();
        let image = nametable(&nt, &palettes, None).unwrap();
        assert_eq!((image.width, image.height), (32, 24));
        assert_eq!(image.get(0, 0), palettes[0].rgb(3).unwrap());
        assert_eq!(image.get(8, 0), palettes[1].rgb(3).unwrap());
        assert_eq!(image.get(0, 8), palettes[2].rgb(3).unwrap());
        assert_eq!(image.get(8, 8), palettes[3].rgb(3).unwrap());
        assert_eq!(image.get(4, 20), palettes[3].rgb(3).unwrap());

        assert!(nametable(&nt, &palettes[..2], None).is_err());
    }

    #[test]
    fn grid_alpha_must_be_an_opacity() {
        let palettes = Palette::defaults();
        let mut nt = Nametable::new(
            BlockLayout::Quad,
            ScreenConfig {
                width_in_tiles: 2,
                height_in_tiles: 2,
            },
        )
        .unwrap();
        let block = Block::new(BlockLayout::Quad, vec![solid(0, 0); 4], Attribute::simple(0));
        nt.set_blocks(vec![block.unwrap()]).unwrap();
        assert!(matches!(
            nametable(&nt, &palettes, Some(5.0)),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(nametable(&nt, &palettes, Some(-0.1)).is_err());

        let image = nametable(&nt, &palettes, Some(1.0)).unwrap();
        // Full opacity covers the block edge with white.
        assert!(image.get(0, 0).r >= 254 && image.get(0, 7).b >= 254);
        assert_eq!(image.get(3, 3), palettes[0].rgb(0).unwrap());
    }

    #[test]
    fn palette_chart() {
        let image = system_palette(2).unwrap();
        assert_eq!((image.width, image.height), (32, 8));
        assert_eq!(image.get(0, 0), system_color(0).unwrap());
        assert_eq!(image.get(3, 5), system_color(0x21).unwrap());
    }
}

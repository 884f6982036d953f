//! Blocks: a square group of tiles sharing one attribute byte.
//!
//! Tiles are stored row-major within the block. A [`BlockLayout::Quad`] block is 2x2 tiles
//! with a simple attribute; a [`BlockLayout::Grid`] block is 4x4 tiles with a
//! nibble-grouped attribute (one field per 2x2 sub-region).

use std::ops::Range;

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{
    attribute::{Attribute, AttributeLayout},
    common::{PaletteIdx, TileIdx},
    error::{CodecError, CodecResult},
    tile::Tile,
};

/// Serialized as the tile count (`4` or `16`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum BlockLayout {
    Quad = 4,
    #[default]
    Grid = 16,
}

impl BlockLayout {
    pub fn capacity(self) -> usize {
        self as usize
    }

    pub fn width_in_tiles(self) -> usize {
        match self {
            BlockLayout::Quad => 2,
            BlockLayout::Grid => 4,
        }
    }

    pub fn height_in_tiles(self) -> usize {
        self.width_in_tiles()
    }

    pub fn attribute_layout(self) -> AttributeLayout {
        match self {
            BlockLayout::Quad => AttributeLayout::Simple,
            BlockLayout::Grid => AttributeLayout::NibbleGrouped,
        }
    }

    /// Tile positions making up one row of the block.
    pub fn row_range(self, row: usize) -> CodecResult<Range<usize>> {
        let width = self.width_in_tiles();
        if row >= self.height_in_tiles() {
            return Err(CodecError::argument(format!(
                "block row {row} out of range (0-{})",
                self.height_in_tiles() - 1
            )));
        }
        Ok(row * width..(row + 1) * width)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    layout: BlockLayout,
    tiles: Vec<Tile>,
    attribute: Attribute,
}

impl Block {
    pub fn new(layout: BlockLayout, tiles: Vec<Tile>, attribute: Attribute) -> CodecResult<Self> {
        let mut block = Block {
            layout,
            tiles: vec![],
            attribute: Attribute::new(layout.attribute_layout(), 0),
        };
        block.set_tiles(tiles)?;
        block.set_attribute(attribute)?;
        Ok(block)
    }

    pub fn layout(&self) -> BlockLayout {
        self.layout
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn set_tiles(&mut self, tiles: Vec<Tile>) -> CodecResult<()> {
        if tiles.len() != self.layout.capacity() {
            return Err(CodecError::dimensions(
                "block tiles",
                self.layout.capacity(),
                tiles.len(),
            ));
        }
        self.tiles = tiles;
        Ok(())
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn set_attribute(&mut self, attribute: Attribute) -> CodecResult<()> {
        if attribute.layout() != self.layout.attribute_layout() {
            return Err(CodecError::argument(format!(
                "{:?} attribute cannot be used with a {}-tile block",
                attribute.layout(),
                self.layout.capacity()
            )));
        }
        self.attribute = attribute;
        Ok(())
    }

    pub fn tile_row(&self, row: usize) -> CodecResult<&[Tile]> {
        Ok(&self.tiles[self.layout.row_range(row)?])
    }

    /// Pattern-table indices of one row of the block, left to right.
    pub fn row_for_nametable(&self, row: usize) -> CodecResult<Vec<TileIdx>> {
        let range = self.layout.row_range(row)?;
        let start = range.start;
        self.tiles[range]
            .iter()
            .enumerate()
            .map(|(i, tile)| {
                tile.index.ok_or_else(|| {
                    CodecError::argument(format!(
                        "tile at block position {} has no pattern-table index",
                        start + i
                    ))
                })
            })
            .collect()
    }

    /// Sub-palette selected by the attribute for the tile at `position`.
    pub fn tile_palette(&self, position: usize) -> CodecResult<PaletteIdx> {
        self.attribute.field(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_tiles(n: usize) -> Vec<Tile> {
        (0..n).map(|i| Tile::default().with_index(i as u8)).collect()
    }

    #[test]
    fn grid_rows() {
        let block = Block::new(
            BlockLayout::Grid,
            indexed_tiles(16),
            Attribute::nibble_grouped(0),
        )
        .unwrap();
        assert_eq!(block.row_for_nametable(0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(block.row_for_nametable(2).unwrap(), vec![8, 9, 10, 11]);
        assert_eq!(block.row_for_nametable(3).unwrap(), vec![12, 13, 14, 15]);
        assert!(matches!(
            block.row_for_nametable(4),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn quad_rows() {
        let block = Block::new(BlockLayout::Quad, indexed_tiles(4), Attribute::simple(0)).unwrap();
        assert_eq!(block.row_for_nametable(0).unwrap(), vec![0, 1]);
        assert_eq!(block.row_for_nametable(1).unwrap(), vec![2, 3]);
        assert!(block.row_for_nametable(2).is_err());
        assert_eq!(block.tile_row(1).unwrap().len(), 2);
    }

    #[test]
    fn rejects_wrong_tile_count() {
        assert!(matches!(
            Block::new(BlockLayout::Grid, indexed_tiles(4), Attribute::nibble_grouped(0)),
            Err(CodecError::InvalidDimensions { actual: 4, .. })
        ));
        let mut block =
            Block::new(BlockLayout::Quad, indexed_tiles(4), Attribute::simple(0)).unwrap();
        assert!(block.set_tiles(indexed_tiles(16)).is_err());
        assert_eq!(block.tiles().len(), 4);
    }

    #[test]
    fn rejects_mismatched_attribute() {
        assert!(matches!(
            Block::new(BlockLayout::Quad, indexed_tiles(4), Attribute::nibble_grouped(0)),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unindexed_tile_is_an_error() {
        let mut tiles = indexed_tiles(4);
        tiles[3].index = None;
        let block = Block::new(BlockLayout::Quad, tiles, Attribute::simple(0)).unwrap();
        assert!(block.row_for_nametable(0).is_ok());
        assert!(matches!(
            block.row_for_nametable(1),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn tile_palette_follows_attribute() {
        let block = Block::new(
            BlockLayout::Grid,
            indexed_tiles(16),
            Attribute::nibble_grouped(0b11_10_01_00),
        )
        .unwrap();
        assert_eq!(block.tile_palette(0).unwrap(), 3);
        assert_eq!(block.tile_palette(7).unwrap(), 2);
        assert_eq!(block.tile_palette(12).unwrap(), 1);
        assert_eq!(block.tile_palette(15).unwrap(), 0);
    }

    #[test]
    fn layout_serializes_as_tile_count() {
        assert_eq!(serde_json::to_string(&BlockLayout::Quad).unwrap(), "4");
        let layout: BlockLayout = serde_json::from_str("16").unwrap();
        assert_eq!(layout, BlockLayout::Grid);
        assert!(serde_json::from_str::<BlockLayout>("8").is_err());
    }
}

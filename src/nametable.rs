//! Full-screen grid of blocks and its serialization.
//!
//! Blocks are supplied row-major. The hardware reads tile indices screen-row by screen-row,
//! so the tile stream interleaves the rows of all blocks in a screen-row of blocks:
//!
//! ```text
//!        Block0  Block1  Block2
//! Row0   AB      EF      IJ       ->  A B E F I J
//! Row1   CD      GH      KL       ->  C D G H K L
//! ```
//!
//! The attribute stream is one byte per block, in block order.
//!
//! If the screen height is not a multiple of the block height (30 tiles with 4x4 blocks),
//! the last screen-row of blocks is only partly visible: only its on-screen tile rows are
//! emitted, while all of its attribute bytes are.

use std::{fs, io::Write, path::Path};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    attribute::Attribute,
    block::{Block, BlockLayout},
    common::TileIdx,
    config::{DumpConfig, ScreenConfig},
    error::{CodecError, CodecResult},
    helpers::{binary_literal, hex_literal},
    tile::Tile,
};

#[derive(Clone, Debug)]
pub struct Nametable {
    layout: BlockLayout,
    screen: ScreenConfig,
    blocks: Vec<Block>,
}

impl Nametable {
    pub fn new(layout: BlockLayout, screen: ScreenConfig) -> CodecResult<Self> {
        screen.validate(layout)?;
        Ok(Nametable {
            layout,
            screen,
            blocks: vec![],
        })
    }

    pub fn layout(&self) -> BlockLayout {
        self.layout
    }

    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }

    pub fn blocks_per_row(&self) -> usize {
        self.screen.width_in_tiles / self.layout.width_in_tiles()
    }

    /// Screen-rows of blocks, counting a trailing partly-visible row.
    pub fn block_rows(&self) -> usize {
        self.screen
            .height_in_tiles
            .div_ceil(self.layout.height_in_tiles())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn set_blocks(&mut self, blocks: Vec<Block>) -> CodecResult<()> {
        let per_row = self.blocks_per_row();
        if blocks.len() % per_row != 0 {
            return Err(CodecError::dimensions(
                "nametable blocks",
                format!("a multiple of {per_row} blocks per screen row"),
                blocks.len(),
            ));
        }
        let expected = per_row * self.block_rows();
        if blocks.len() != expected {
            return Err(CodecError::dimensions("nametable blocks", expected, blocks.len()));
        }
        if let Some(pos) = blocks.iter().position(|b| b.layout() != self.layout) {
            return Err(CodecError::argument(format!(
                "block {pos} has {} tiles, nametable expects {}",
                blocks[pos].layout().capacity(),
                self.layout.capacity()
            )));
        }
        self.blocks = blocks;
        Ok(())
    }

    /// Number of tile rows of screen-row `block_row` that are on screen.
    fn visible_tile_rows(&self, block_row: usize) -> usize {
        let block_height = self.layout.height_in_tiles();
        let remaining = self.screen.height_in_tiles - block_row * block_height;
        remaining.min(block_height)
    }

    /// Tile indices in hardware raster order.
    pub fn tile_stream(&self) -> CodecResult<Vec<TileIdx>> {
        let mut stream =
            Vec::with_capacity(self.screen.width_in_tiles * self.screen.height_in_tiles);
        for (block_row, row_blocks) in self.blocks.chunks(self.blocks_per_row()).enumerate() {
            let visible = self.visible_tile_rows(block_row);
            if visible < self.layout.height_in_tiles() {
                debug!(
                    "Screen row {} is half-height: emitting {} of {} tile rows",
                    block_row,
                    visible,
                    self.layout.height_in_tiles()
                );
            }
            for tile_row in 0..visible {
                for block in row_blocks {
                    stream.extend(block.row_for_nametable(tile_row)?);
                }
            }
        }
        Ok(stream)
    }

    pub fn attribute_stream(&self) -> Vec<u8> {
        self.blocks.iter().map(|b| b.attribute().byte()).collect()
    }

    /// The binary nametable: tile stream followed by attribute stream.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut bytes = self.tile_stream()?;
        bytes.extend(self.attribute_stream());
        Ok(bytes)
    }

    pub fn to_dump(
        &self,
        config: &DumpConfig,
        tile_tag: &str,
        attr_tag: &str,
    ) -> CodecResult<String> {
        config.validate()?;
        let tiles = self.tile_stream()?;
        let attributes = self.attribute_stream();
        let mut out = String::new();
        out.push_str(&config.header);
        out.push('\n');
        out.push_str(&db_section(tile_tag, &tiles, config.bytes_per_row, hex_literal));
        out.push_str(&db_section(
            attr_tag,
            &attributes,
            config.attributes_per_row,
            binary_literal,
        ));
        Ok(out)
    }

    /// The dump is fully rendered before anything is written.
    pub fn write_dump<W: Write>(
        &self,
        out: &mut W,
        config: &DumpConfig,
        tile_tag: &str,
        attr_tag: &str,
    ) -> CodecResult<()> {
        let text = self.to_dump(config, tile_tag, attr_tag)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn dump_to_file(
        &self,
        path: &Path,
        config: &DumpConfig,
        tile_tag: &str,
        attr_tag: &str,
    ) -> CodecResult<()> {
        let text = self.to_dump(config, tile_tag, attr_tag)?;
        fs::write(path, text)?;
        Ok(())
    }
}

fn db_section(tag: &str, bytes: &[u8], per_row: usize, literal: fn(u8) -> String) -> String {
    let mut out = format!("\n{tag}:\n");
    for row in bytes.chunks(per_row) {
        out.push_str("    .db ");
        out.push_str(&row.iter().map(|&b| literal(b)).join(","));
        out.push('\n');
    }
    out
}

/// One block of a layout document: pattern-table indices row-major, plus the attribute byte.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub tiles: Vec<TileIdx>,
    #[serde(default)]
    pub attribute: u8,
}

/// A nametable described by tile indices, resolved against a loaded pattern table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NametableLayout {
    pub blocks: Vec<BlockSpec>,
}

impl NametableLayout {
    pub fn build(
        &self,
        pattern_table: &[Tile],
        layout: BlockLayout,
        screen: ScreenConfig,
    ) -> CodecResult<Nametable> {
        let blocks = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let tiles = entry
                    .tiles
                    .iter()
                    .map(|&idx| {
                        pattern_table.get(idx as usize).copied().ok_or_else(|| {
                            CodecError::argument(format!(
                                "block {i} references tile {idx:#04X}, pattern table has {} tiles",
                                pattern_table.len()
                            ))
                        })
                    })
                    .collect::<CodecResult<Vec<_>>>()?;
                Block::new(
                    layout,
                    tiles,
                    Attribute::new(layout.attribute_layout(), entry.attribute),
                )
            })
            .collect::<CodecResult<Vec<_>>>()?;
        let mut nametable = Nametable::new(layout, screen)?;
        nametable.set_blocks(blocks)?;
        Ok(nametable)
    }
}

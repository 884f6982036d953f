//! Raw tile data (`.chr`): back-to-back 16-byte tiles with no header.

use itertools::Itertools;

use crate::{
    common::{BYTES_PER_TILE, PATTERN_TABLE_TILES},
    error::{CodecError, CodecResult},
    tile::Tile,
};

/// Split raw data into tiles. Each tile's index is its position within its 256-tile
/// pattern table, i.e. the byte a nametable uses to reference it.
pub fn load(data: &[u8]) -> CodecResult<Vec<Tile>> {
    if data.len() % BYTES_PER_TILE != 0 {
        return Err(CodecError::dimensions(
            "CHR data length",
            format!("a multiple of {BYTES_PER_TILE}"),
            data.len(),
        ));
    }
    data.chunks_exact(BYTES_PER_TILE)
        .enumerate()
        .map(|(i, chunk)| {
            Tile::from_raw_bytes(chunk).map(|t| t.with_index((i % PATTERN_TABLE_TILES) as u8))
        })
        .collect()
}

pub fn to_bytes(tiles: &[Tile]) -> Vec<u8> {
    tiles.iter().flat_map(|t| t.raw_bytes()).collect()
}

/// The tiles of pattern table `table` (0 for the first 256 tiles, 1 for the next 256, ...).
pub fn pattern_table(tiles: &[Tile], table: usize) -> CodecResult<&[Tile]> {
    let start = table * PATTERN_TABLE_TILES;
    if start >= tiles.len() {
        return Err(CodecError::argument(format!(
            "pattern table {table} is beyond the {} loaded tiles",
            tiles.len()
        )));
    }
    let end = (start + PATTERN_TABLE_TILES).min(tiles.len());
    Ok(&tiles[start..end])
}

/// Listing of raw bytes, 8 per line (`0x3C 0x42 ...`).
pub fn hex_listing(data: &[u8]) -> String {
    data.chunks(8)
        .map(|line| line.iter().map(|b| format!("0x{:02X}", b)).join(" "))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tile_count: usize) -> Vec<u8> {
        (0..tile_count * BYTES_PER_TILE).map(|i| (i * 7) as u8).collect()
    }

    #[test]
    fn load_and_write_back() {
        let data = sample(3);
        let tiles = load(&data).unwrap();
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2].index, Some(2));
        assert_eq!(tiles[1].raw_bytes().to_vec(), data[16..32].to_vec());
        assert_eq!(to_bytes(&tiles), data);
    }

    #[test]
    fn rejects_partial_tile() {
        assert!(matches!(
            load(&[0; 33]),
            Err(CodecError::InvalidDimensions { actual: 33, .. })
        ));
        assert!(load(&[]).unwrap().is_empty());
    }

    #[test]
    fn indices_wrap_per_pattern_table() {
        let tiles = load(&vec![0; 300 * BYTES_PER_TILE]).unwrap();
        assert_eq!(tiles[255].index, Some(255));
        assert_eq!(tiles[256].index, Some(0));
        assert_eq!(tiles[299].index, Some(43));

        assert_eq!(pattern_table(&tiles, 0).unwrap().len(), 256);
        let second = pattern_table(&tiles, 1).unwrap();
        assert_eq!(second.len(), 44);
        assert_eq!(second[10].index, Some(10));
        assert!(pattern_table(&tiles, 2).is_err());
    }

    #[test]
    fn listing() {
        let data: Vec<u8> = (0..10).collect();
        assert_eq!(
            hex_listing(&data),
            "0x00 0x01 0x02 0x03 0x04 0x05 0x06 0x07\n0x08 0x09"
        );
    }
}

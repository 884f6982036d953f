pub type PixelValue = u8; // 2-bit color index into a 4-color palette (0-3)
pub type TileIdx = u8; // Index into the pattern table (0-255)
pub type ColorIdx = u8; // Index into the NES system palette (0-63)
pub type PaletteIdx = u8; // Index into the list of sub-palettes (0-3 for attributes)

pub const TILE_SIZE: usize = 8;
pub const BYTES_PER_TILE: usize = 16;
pub const PLANE_BYTES: usize = 8;

// Number of tiles addressable by a single nametable byte.
pub const PATTERN_TABLE_TILES: usize = 256;

pub const SYSTEM_PALETTE_SIZE: usize = 64;
pub const COLORS_PER_PALETTE: usize = 4;

// 256x240 pixels.
pub const SCREEN_WIDTH_TILES: usize = 32;
pub const SCREEN_HEIGHT_TILES: usize = 30;

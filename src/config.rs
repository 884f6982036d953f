use serde::{Deserialize, Serialize};

use crate::{
    block::BlockLayout,
    common::{SCREEN_HEIGHT_TILES, SCREEN_WIDTH_TILES},
    error::{CodecError, CodecResult},
    palette::Palette,
};

pub const DEFAULT_HEADER: &str = "; Nametable generated from Python script";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width_in_tiles: usize,
    pub height_in_tiles: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            width_in_tiles: SCREEN_WIDTH_TILES,
            height_in_tiles: SCREEN_HEIGHT_TILES,
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self, layout: BlockLayout) -> CodecResult<()> {
        if self.width_in_tiles == 0 || self.height_in_tiles == 0 {
            return Err(CodecError::argument("screen dimensions must be non-zero"));
        }
        if self.width_in_tiles % layout.width_in_tiles() != 0 {
            return Err(CodecError::argument(format!(
                "screen width of {} tiles is not a multiple of the {}-tile block width",
                self.width_in_tiles,
                layout.width_in_tiles()
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// `.db` literals per line in the tile-index section.
    pub bytes_per_row: usize,
    /// `.db` literals per line in the attribute section.
    pub attributes_per_row: usize,
    pub header: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        DumpConfig {
            bytes_per_row: 16,
            attributes_per_row: 6,
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl DumpConfig {
    pub fn validate(&self) -> CodecResult<()> {
        if self.bytes_per_row == 0 || self.attributes_per_row == 0 {
            return Err(CodecError::argument("dump row widths must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub block_layout: BlockLayout,
    pub screen: ScreenConfig,
    pub dump: DumpConfig,
    pub palettes: Vec<Palette>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            block_layout: BlockLayout::default(),
            screen: ScreenConfig::default(),
            dump: DumpConfig::default(),
            palettes: Palette::defaults(),
        }
    }
}

impl ProjectConfig {
    pub fn validate(&self) -> CodecResult<()> {
        self.screen.validate(self.block_layout)?;
        self.dump.validate()?;
        if self.palettes.is_empty() {
            return Err(CodecError::argument("at least one palette is required"));
        }
        Ok(())
    }

    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name() == name)
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::{
    chr,
    config::{DumpConfig, ProjectConfig},
    nametable::{Nametable, NametableLayout},
    render::RgbaImage,
    tile::Tile,
};

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    create_parent_dir(path)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes =
        fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let data: T = serde_json::from_slice(&data_bytes)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(data)
}

pub fn default_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "ChrNametable")
        .context("Unable to open global config directory.")?;
    Ok(project_dirs.config_dir().join("config.json"))
}

/// Load the configuration at `path` (or the default location). A missing file yields the
/// built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    let path = match path {
        Some(p) => p.to_owned(),
        None => default_config_path()?,
    };
    let config = if path.exists() {
        load_json(&path)?
    } else {
        info!("No config at {}, using defaults", path.display());
        ProjectConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    Ok(config)
}

pub fn load_chr(path: &Path) -> Result<Vec<Tile>> {
    info!("Loading {}", path.display());
    let data = fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let tiles =
        chr::load(&data).with_context(|| format!("Invalid tile data in {}", path.display()))?;
    info!("Loaded {} tiles", tiles.len());
    if tiles.is_empty() {
        warn!("{} contains no tiles", path.display());
    }
    Ok(tiles)
}

pub fn save_chr(path: &Path, tiles: &[Tile]) -> Result<()> {
    info!("Saving {}", path.display());
    create_parent_dir(path)?;
    fs::write(path, chr::to_bytes(tiles))?;
    Ok(())
}

pub fn load_nametable(
    layout_path: &Path,
    pattern_table: &[Tile],
    config: &ProjectConfig,
) -> Result<Nametable> {
    let layout: NametableLayout = load_json(layout_path)?;
    let nametable = layout
        .build(pattern_table, config.block_layout, config.screen.clone())
        .with_context(|| format!("Invalid nametable layout {}", layout_path.display()))?;
    info!(
        "Assembled {} blocks ({} per screen row)",
        nametable.blocks().len(),
        nametable.blocks_per_row()
    );
    Ok(nametable)
}

pub fn save_dump(
    path: &Path,
    nametable: &Nametable,
    config: &DumpConfig,
    tile_tag: &str,
    attr_tag: &str,
) -> Result<()> {
    // Render first so that an invalid nametable leaves no file behind.
    let text = nametable.to_dump(config, tile_tag, attr_tag)?;
    info!("Saving {} ({})", path.display(), dump_summary(nametable)?);
    create_parent_dir(path)?;
    fs::write(path, text).with_context(|| format!("Unable to write {}", path.display()))?;
    Ok(())
}

fn dump_summary(nametable: &Nametable) -> Result<String> {
    Ok(format!(
        "{} tile bytes, {} attribute bytes",
        nametable.tile_stream()?.len(),
        nametable.attribute_stream().len()
    ))
}

pub fn save_nametable_bin(path: &Path, nametable: &Nametable) -> Result<()> {
    let bytes = nametable.to_bytes()?;
    info!("Saving {} ({} bytes)", path.display(), bytes.len());
    create_parent_dir(path)?;
    fs::write(path, bytes).with_context(|| format!("Unable to write {}", path.display()))?;
    Ok(())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_bytes = vec![];
    {
        let mut encoder =
            png::Encoder::new(&mut png_bytes, image.width as u32, image.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.data)?;
    }
    Ok(png_bytes)
}

pub fn save_png(path: &Path, image: &RgbaImage) -> Result<()> {
    let png_bytes = encode_png(image)?;
    info!("Saving {}", path.display());
    create_parent_dir(path)?;
    fs::write(path, png_bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{block::BlockLayout, config::ScreenConfig, nametable::BlockSpec};

    #[test]
    fn dump_summary_counts_both_streams() {
        let tiles: Vec<Tile> = (0..=255).map(|i| Tile::default().with_index(i)).collect();
        let layout = NametableLayout {
            blocks: vec![
                BlockSpec {
                    tiles: (0..16).collect(),
                    attribute: 0,
                };
                64
            ],
        };
        let nametable = layout
            .build(&tiles, BlockLayout::Grid, ScreenConfig::default())
            .unwrap();
        assert_eq!(dump_summary(&nametable).unwrap(), "960 tile bytes, 64 attribute bytes");
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use chr_nametable::{
    chr,
    config::ProjectConfig,
    persist::{self, load_chr, load_config, load_nametable},
    render,
};

#[derive(Parser, Debug)]
#[command(version, about = "Encode NES tiles and nametables into assembler source")]
struct Args {
    /// Configuration file (defaults to the per-user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a nametable layout as `.db` assembler source
    Dump {
        chr: PathBuf,
        layout: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "nametable")]
        tile_tag: String,
        #[arg(long, default_value = "attribute")]
        attr_tag: String,
        /// Also write the raw nametable + attribute bytes
        #[arg(long)]
        bin: Option<PathBuf>,
        /// Pattern table (group of 256 tiles) the layout refers to
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
    /// Print tiles as digit matrices
    Show {
        chr: PathBuf,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Print the raw bytes of a tile file
    Hexdump { chr: PathBuf },
    /// Render all tiles of a file to a PNG sheet
    Sheet {
        chr: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Palette name from the configuration (first palette if omitted)
        #[arg(long)]
        palette: Option<String>,
        #[arg(long, default_value_t = 16)]
        columns: usize,
    },
    /// Render a nametable layout to a PNG
    Render {
        chr: PathBuf,
        layout: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 0)]
        table: usize,
        /// Overlay block boundaries with this opacity (0-1)
        #[arg(long)]
        grid_alpha: Option<f32>,
    },
    /// Render the system palette chart to a PNG
    Palette {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 20)]
        cell: usize,
    },
    /// Write the default configuration
    InitConfig { path: Option<PathBuf> },
}

fn select_palette<'a>(
    config: &'a ProjectConfig,
    name: Option<&str>,
) -> Result<&'a chr_nametable::palette::Palette> {
    match name {
        Some(name) => config
            .palette(name)
            .with_context(|| format!("No palette named {name}")),
        None => config.palettes.first().context("No palettes configured"),
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::InitConfig { path } => {
            let path = match path.or(args.config) {
                Some(p) => p,
                None => persist::default_config_path()?,
            };
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            persist::save_json(&path, &ProjectConfig::default())?;
        }
        Command::Dump {
            chr: chr_path,
            layout,
            output,
            tile_tag,
            attr_tag,
            bin,
            table,
        } => {
            let config = load_config(args.config.as_deref())?;
            let tiles = load_chr(&chr_path)?;
            let nametable = load_nametable(&layout, chr::pattern_table(&tiles, table)?, &config)?;
            persist::save_dump(&output, &nametable, &config.dump, &tile_tag, &attr_tag)?;
            if let Some(bin) = bin {
                persist::save_nametable_bin(&bin, &nametable)?;
            }
        }
        Command::Show { chr: chr_path, index } => {
            let tiles = load_chr(&chr_path)?;
            let selected: Vec<usize> = match index {
                Some(i) if i < tiles.len() => vec![i],
                Some(i) => bail!("Tile {} out of range ({} tiles)", i, tiles.len()),
                None => (0..tiles.len()).collect(),
            };
            for i in selected {
                println!("tile {i}:\n{}\n", tiles[i]);
            }
        }
        Command::Hexdump { chr: chr_path } => {
            let data = std::fs::read(&chr_path)
                .with_context(|| format!("Unable to read {}", chr_path.display()))?;
            println!("{}", chr::hex_listing(&data));
        }
        Command::Sheet {
            chr: chr_path,
            output,
            palette,
            columns,
        } => {
            let config = load_config(args.config.as_deref())?;
            let palette = select_palette(&config, palette.as_deref())?;
            let tiles = load_chr(&chr_path)?;
            let image = render::tile_sheet(&tiles, &config.palettes, palette, columns)?;
            persist::save_png(&output, &image)?;
        }
        Command::Render {
            chr: chr_path,
            layout,
            output,
            table,
            grid_alpha,
        } => {
            let config = load_config(args.config.as_deref())?;
            let tiles = load_chr(&chr_path)?;
            let nametable = load_nametable(&layout, chr::pattern_table(&tiles, table)?, &config)?;
            let image = render::nametable(&nametable, &config.palettes, grid_alpha)?;
            persist::save_png(&output, &image)?;
        }
        Command::Palette { output, cell } => {
            if cell == 0 {
                bail!("Cell size must be at least 1");
            }
            let image = render::system_palette(cell)?;
            persist::save_png(&output, &image)?;
        }
    }
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(args)?;
    info!("Done.");
    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use isotile::config::GeneratorConfig;
use isotile::document::LayerSlots;
use isotile::pipeline;
use isotile::spritesheet::SheetOptions;

#[derive(Parser, Debug)]
#[command(name = "isotile")]
#[command(about = "Generate an isometric office tileset and paint it into a tile map")]
struct Args {
    /// Map document to patch (tileset + floor/wall layers). Images only if omitted
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Output directory for the sprite sheet
    #[arg(short, long, default_value = "public/tilesets")]
    out_dir: PathBuf,

    /// Sprite sheet file name
    #[arg(long, default_value = "office-tileset.png")]
    sheet_file: String,

    /// Random seed for texture noise (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tiles per sprite sheet row
    #[arg(long, default_value = "4")]
    tiles_per_row: u32,

    /// Floor tile width in pixels
    #[arg(long, default_value = "64")]
    tile_width: u32,

    /// Floor tile height in pixels (walls and doors are twice this)
    #[arg(long, default_value = "32")]
    tile_height: u32,

    /// Image path written into the tileset, relative to the map
    #[arg(long, default_value = "../tilesets/office-tileset.png")]
    image_ref: String,

    /// Tileset name written into the map
    #[arg(long, default_value = "office-tiles")]
    tileset_name: String,

    /// Tile catalog JSON (built-in office catalog if not specified)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Layout plan JSON (built-in office layout if not specified)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Also write every tile as its own PNG
    #[arg(long)]
    individual_tiles: bool,

    /// Index of the floor layer in the map
    #[arg(long, default_value = "0")]
    floor_layer: usize,

    /// Index of the wall layer in the map
    #[arg(long, default_value = "1")]
    wall_layer: usize,
}

impl Args {
    fn into_config(self) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        GeneratorConfig {
            sheet: SheetOptions {
                tile_width: self.tile_width,
                tile_height: self.tile_height,
                tiles_per_row: self.tiles_per_row,
                ..defaults.sheet
            },
            seed: self.seed,
            out_dir: self.out_dir,
            sheet_file: self.sheet_file,
            individual_tiles: self.individual_tiles,
            map: self.map,
            tileset_name: self.tileset_name,
            image_ref: self.image_ref,
            layers: LayerSlots {
                floor: self.floor_layer,
                wall: self.wall_layer,
            },
            catalog: self.catalog,
            layout: self.layout,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();
    let (generated, report) = pipeline::run(&config).context("tile generation failed")?;

    println!("Seed: {}", report.seed);
    println!(
        "Sprite sheet: {} ({}x{}, {} tiles)",
        report.sheet_path.display(),
        report.sheet_size.0,
        report.sheet_size.1,
        generated.sheet.index.len()
    );
    for path in &report.tile_paths {
        println!("  tile: {}", path.display());
    }
    if let Some(map) = &report.map_path {
        println!(
            "Map updated: {} ({}x{} layout)",
            map.display(),
            generated.layout.floor.width,
            generated.layout.floor.height
        );
    }

    println!("\nTile index:");
    for (slot, name, col, row) in generated.sheet.index.iter() {
        println!("  {:2}. {:15} - id {:2} at ({}, {})", slot, name, slot + 1, col, row);
    }

    Ok(())
}

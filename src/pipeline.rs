//! One-shot generation run: catalog → sheet → layout → map document.
//!
//! Everything that can fail on bad input happens in [`generate`], entirely in memory.
//! [`persist`] only writes finished results, so a rejected run leaves no files behind.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::TileCatalog;
use crate::config::GeneratorConfig;
use crate::document::{self, TilesetDescriptor};
use crate::error::{Error, Result};
use crate::layout::{LayoutPlan, PaintedLayout};
use crate::seeds::TileSeeds;
use crate::spritesheet::{compose, SpriteSheet};

/// Results of a run before anything touches the filesystem.
pub struct Generated {
    pub seed: u64,
    pub sheet: SpriteSheet,
    pub layout: PaintedLayout,
    pub tileset: TilesetDescriptor,
    /// The patched map document, if a map was configured.
    pub document: Option<Value>,
}

/// What a completed run wrote.
#[derive(Debug)]
pub struct GenerationReport {
    pub seed: u64,
    pub sheet_path: PathBuf,
    pub sheet_size: (u32, u32),
    pub tile_paths: Vec<PathBuf>,
    pub map_path: Option<PathBuf>,
}

pub fn generate(config: &GeneratorConfig) -> Result<Generated> {
    let catalog = match &config.catalog {
        Some(path) => TileCatalog::load(path)?,
        None => TileCatalog::office(),
    };
    let plan = match &config.layout {
        Some(path) => LayoutPlan::load(path)?,
        None => LayoutPlan::office(),
    };

    let seeds = match config.seed {
        Some(seed) => TileSeeds::from_master(seed),
        None => {
            let seeds = TileSeeds::default();
            warn!(seed = seeds.master, "no seed given, textures will differ between runs");
            seeds
        }
    };
    let seed = seeds.master;

    info!(tiles = catalog.len(), seed, "composing sprite sheet");
    let sheet = compose(&catalog, &config.sheet, &seeds)?;
    info!(
        width = sheet.image.width(),
        height = sheet.image.height(),
        "sprite sheet composed"
    );

    info!(
        width = plan.width,
        height = plan.height,
        zones = plan.zones.len(),
        "painting layout"
    );
    let layout = plan.paint(&sheet.index)?;

    let tileset = sheet.descriptor(&config.tileset_name, &config.image_ref);

    let document = match &config.map {
        Some(path) => {
            let mut doc = document::load(path)?;
            document::patch(
                &mut doc,
                &tileset,
                layout.floor.as_flat(),
                layout.wall.as_flat(),
                config.layers,
            )?;
            debug!(path = %path.display(), "map document patched in memory");
            Some(doc)
        }
        None => None,
    };

    Ok(Generated {
        seed,
        sheet,
        layout,
        tileset,
        document,
    })
}

/// Write the sheet, optional tile images and patched map.
///
/// Every file is staged under a `.tmp` name first and moved into place only once all
/// of them were written, so a failed write leaves none of the outputs behind.
pub fn persist(config: &GeneratorConfig, generated: &Generated) -> Result<GenerationReport> {
    let created_dir = !config.out_dir.exists();
    fs::create_dir_all(&config.out_dir).map_err(|e| Error::io(&config.out_dir, e))?;

    let mut staging = Staging::default();
    let written = stage_outputs(config, generated, &mut staging)
        .and_then(|report| staging.commit().map(|()| report));
    drop(staging);
    if written.is_err() && created_dir {
        // Only removes the directory if nothing else ended up in it.
        let _ = fs::remove_dir(&config.out_dir);
    }
    let report = written?;

    info!(path = %report.sheet_path.display(), "wrote sprite sheet");
    if let Some(path) = &report.map_path {
        info!(path = %path.display(), "wrote map document");
    }
    Ok(report)
}

fn stage_outputs(
    config: &GeneratorConfig,
    generated: &Generated,
    staging: &mut Staging,
) -> Result<GenerationReport> {
    let sheet_path = config.sheet_path();
    let tmp = staging.add(&sheet_path);
    generated.sheet.image.save_with_format(&tmp, ImageFormat::Png)?;

    let mut tile_paths = Vec::new();
    if config.individual_tiles {
        for (slot, name, _, _) in generated.sheet.index.iter() {
            let path = config.out_dir.join(format!("{}.png", name));
            let tmp = staging.add(&path);
            generated.sheet.tiles[slot].save_with_format(&tmp, ImageFormat::Png)?;
            debug!(path = %path.display(), "staged tile");
            tile_paths.push(path);
        }
    }

    let map_path = match (&config.map, &generated.document) {
        (Some(path), Some(doc)) => {
            let tmp = staging.add(path);
            document::write_pretty(&tmp, doc)?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(GenerationReport {
        seed: generated.seed,
        sheet_path,
        sheet_size: generated.sheet.image.dimensions(),
        tile_paths,
        map_path,
    })
}

/// Outputs written under their staging names, waiting to be renamed into place.
///
/// Anything still staged when this is dropped is deleted.
#[derive(Default)]
struct Staging {
    pending: VecDeque<(PathBuf, PathBuf)>,
}

impl Staging {
    /// Register `target` and return the path to write it to.
    fn add(&mut self, target: &Path) -> PathBuf {
        let tmp = document::staging_path(target);
        self.pending.push_back((tmp.clone(), target.to_path_buf()));
        tmp
    }

    fn commit(&mut self) -> Result<()> {
        while let Some((tmp, target)) = self.pending.front() {
            fs::rename(tmp, target).map_err(|e| Error::io(target, e))?;
            self.pending.pop_front();
        }
        Ok(())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        for (tmp, _) in self.pending.drain(..) {
            if tmp.is_file() {
                let _ = fs::remove_file(&tmp);
            }
        }
    }
}

/// Generate everything, then write it.
pub fn run(config: &GeneratorConfig) -> Result<(Generated, GenerationReport)> {
    let generated = generate(config)?;
    let report = persist(config, &generated)?;
    Ok((generated, report))
}

//! Run configuration for the generator.

use std::path::PathBuf;

use crate::document::LayerSlots;
use crate::spritesheet::SheetOptions;

/// Everything a single generation run needs to know.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub sheet: SheetOptions,
    /// Master seed for texture noise. `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Directory the sprite sheet (and optional per-tile images) are written to.
    pub out_dir: PathBuf,
    pub sheet_file: String,
    /// Write each tile as `<name>.png` next to the sheet.
    pub individual_tiles: bool,
    /// Map document to patch. Without one only images are produced.
    pub map: Option<PathBuf>,
    pub tileset_name: String,
    /// Image path recorded in the tileset, relative to the map document.
    pub image_ref: String,
    pub layers: LayerSlots,
    /// Tile catalog JSON; the built-in office catalog when `None`.
    pub catalog: Option<PathBuf>,
    /// Layout plan JSON; the built-in office layout when `None`.
    pub layout: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sheet: SheetOptions::default(),
            seed: None,
            out_dir: PathBuf::from("public/tilesets"),
            sheet_file: "office-tileset.png".to_string(),
            individual_tiles: false,
            map: None,
            tileset_name: "office-tiles".to_string(),
            image_ref: "../tilesets/office-tileset.png".to_string(),
            layers: LayerSlots::default(),
            catalog: None,
            layout: None,
        }
    }
}

impl GeneratorConfig {
    pub fn sheet_path(&self) -> PathBuf {
        self.out_dir.join(&self.sheet_file)
    }
}

//! Tile catalog: the ordered list of tiles that make up the sheet.
//!
//! Catalog order is the contract between the sprite sheet and every layout that
//! references it by numeric ID. Appending is safe; reordering or removing entries
//! renumbers everything after the change.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::canvas::Rgb;
use crate::error::{Error, Result};
use crate::shapes::{ShapeKind, WallStyle};
use crate::texture::TextureKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileDefinition {
    pub name: String,
    pub shape: ShapeKind,
    pub texture: TextureKind,
    pub color: Rgb,
    pub outline: Option<Rgb>,
}

impl TileDefinition {
    pub fn new(
        name: &str,
        shape: ShapeKind,
        texture: TextureKind,
        color: Rgb,
        outline: Option<Rgb>,
    ) -> Self {
        Self {
            name: name.to_string(),
            shape,
            texture,
            color,
            outline,
        }
    }

    fn floor(name: &str, texture: TextureKind, color: Rgb) -> Self {
        Self::new(name, ShapeKind::FloorDiamond, texture, color, Some(FLOOR_OUTLINE))
    }
}

const FLOOR_OUTLINE: Rgb = [0, 0, 0];

/// An ordered set of uniquely named tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCatalog {
    tiles: Vec<TileDefinition>,
}

impl TileCatalog {
    /// Build a catalog, rejecting empty lists and duplicate names.
    pub fn new(tiles: Vec<TileDefinition>) -> Result<Self> {
        if tiles.is_empty() {
            return Err(Error::InvalidConfig("tile catalog is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for tile in &tiles {
            if !seen.insert(tile.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate tile name '{}' in catalog",
                    tile.name
                )));
            }
        }
        Ok(Self { tiles })
    }

    /// The office tile set: eight floors, two walls and a door.
    pub fn office() -> Self {
        use TextureKind::{Carpet, TileSeam, Wood};
        Self {
            tiles: vec![
                TileDefinition::floor("wood_light", Wood, [205, 170, 125]),
                TileDefinition::floor("wood_dark", Wood, [139, 90, 60]),
                TileDefinition::floor("carpet_red", Carpet, [180, 60, 60]),
                TileDefinition::floor("carpet_blue", Carpet, [60, 100, 180]),
                TileDefinition::floor("carpet_green", Carpet, [80, 140, 80]),
                TileDefinition::floor("tile_white", TileSeam, [240, 240, 245]),
                TileDefinition::floor("tile_gray", TileSeam, [200, 200, 200]),
                TileDefinition::floor("concrete", TextureKind::None, [150, 150, 150]),
                TileDefinition::new(
                    "wall_office",
                    ShapeKind::Wall(WallStyle::Office),
                    TextureKind::None,
                    [220, 220, 230],
                    Some([180, 180, 190]),
                ),
                TileDefinition::new(
                    "wall_brick",
                    ShapeKind::Wall(WallStyle::Brick),
                    TextureKind::None,
                    [180, 140, 120],
                    Some([160, 120, 100]),
                ),
                TileDefinition::new(
                    "door",
                    ShapeKind::Door,
                    TextureKind::None,
                    [139, 90, 60],
                    Some([100, 60, 40]),
                ),
            ],
        }
    }

    /// Parse a catalog from JSON:
    /// `[{"name": "...", "shape": "floor", "texture": "wood", "color": [r, g, b], "outline": [r, g, b]}]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<TileRecord> = serde_json::from_str(json)?;
        let tiles = records
            .into_iter()
            .map(TileRecord::into_definition)
            .collect::<Result<Vec<_>>>()?;
        Self::new(tiles)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.iter()
    }

    /// Tallest tile canvas for a given base tile height.
    pub fn max_canvas_height(&self, tile_height: u32) -> Result<u32> {
        let mut tallest = tile_height;
        for tile in &self.tiles {
            tallest = tallest.max(tile.shape.canvas_height(tile_height)?);
        }
        Ok(tallest)
    }
}

#[derive(Deserialize)]
struct TileRecord {
    name: String,
    shape: String,
    #[serde(default = "default_texture")]
    texture: String,
    color: Rgb,
    #[serde(default)]
    outline: Option<Rgb>,
}

fn default_texture() -> String {
    "none".to_string()
}

impl TileRecord {
    fn into_definition(self) -> Result<TileDefinition> {
        Ok(TileDefinition {
            shape: self.shape.parse()?,
            texture: self.texture.parse()?,
            name: self.name,
            color: self.color,
            outline: self.outline,
        })
    }
}

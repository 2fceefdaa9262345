//! Sprite sheet composition and the name → slot index that layouts resolve through.

use std::collections::HashMap;

use image::{imageops, RgbaImage};
use tracing::debug;

use crate::canvas::Canvas;
use crate::catalog::TileCatalog;
use crate::document::TilesetDescriptor;
use crate::error::{Error, Result};
use crate::seeds::TileSeeds;
use crate::shapes::draw_shape;
use crate::texture::{apply_texture, TextureParams};

/// Map layers reserve 0 for "no tile", so slot `n` is written as ID `n + 1`.
pub const FIRST_GID: u32 = 1;

/// Bijection between tile names and zero-based sheet slots.
///
/// This is the only place numeric tile IDs come from; layouts and the tileset
/// descriptor both resolve through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSheetIndex {
    tiles_per_row: u32,
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl SpriteSheetIndex {
    /// Assign slots in iteration order.
    pub fn new<I, S>(names: I, tiles_per_row: u32) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if tiles_per_row == 0 {
            return Err(Error::InvalidConfig("tiles per row must be at least 1".to_string()));
        }

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut slots = HashMap::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            if slots.insert(name.clone(), slot).is_some() {
                return Err(Error::InvalidConfig(format!("duplicate tile name '{}'", name)));
            }
        }

        Ok(Self {
            tiles_per_row,
            names,
            slots,
        })
    }

    pub fn from_catalog(catalog: &TileCatalog, tiles_per_row: u32) -> Result<Self> {
        Self::new(catalog.iter().map(|t| t.name.as_str()), tiles_per_row)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    /// Number of sheet rows needed for every slot.
    pub fn rows(&self) -> u32 {
        (self.names.len() as u32).div_ceil(self.tiles_per_row)
    }

    pub fn slot(&self, name: &str) -> Result<usize> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| Error::IndexResolution(format!("'{}'", name)))
    }

    /// Map-layer ID for a tile name.
    pub fn tile_id(&self, name: &str) -> Result<u32> {
        Ok(self.slot(name)? as u32 + FIRST_GID)
    }

    /// Accept 0 (empty cell) or any ID that maps back to a slot.
    pub fn check_id(&self, id: u32) -> Result<u32> {
        if id == 0 || ((id - FIRST_GID) as usize) < self.names.len() {
            Ok(id)
        } else {
            Err(Error::IndexResolution(format!(
                "id {} (sheet has {} tiles)",
                id,
                self.names.len()
            )))
        }
    }

    pub fn name(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }

    /// Grid position `(column, row)` of a slot.
    pub fn position(&self, slot: usize) -> (u32, u32) {
        let slot = slot as u32;
        (slot % self.tiles_per_row, slot / self.tiles_per_row)
    }

    /// `(slot, name, column, row)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, u32, u32)> + '_ {
        self.names.iter().enumerate().map(move |(slot, name)| {
            let (col, row) = self.position(slot);
            (slot, name.as_str(), col, row)
        })
    }
}

/// Geometry and texture settings for composing a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetOptions {
    /// Base floor tile width in pixels (also the sheet's column width).
    pub tile_width: u32,
    /// Base floor tile height in pixels; walls and doors are twice this.
    pub tile_height: u32,
    pub tiles_per_row: u32,
    pub texture: TextureParams,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            tile_width: 64,
            tile_height: 32,
            tiles_per_row: 4,
            texture: TextureParams::default(),
        }
    }
}

/// A composed sheet with the individual tile images it was built from.
pub struct SpriteSheet {
    pub image: RgbaImage,
    pub index: SpriteSheetIndex,
    /// Tile images in slot order.
    pub tiles: Vec<Canvas>,
    /// Column width.
    pub cell_width: u32,
    /// Row height: the tallest tile in the catalog.
    pub cell_height: u32,
}

impl SpriteSheet {
    /// Tileset record for the map document, pointing at `image_ref`.
    pub fn descriptor(&self, name: &str, image_ref: &str) -> TilesetDescriptor {
        TilesetDescriptor {
            columns: self.index.tiles_per_row(),
            firstgid: FIRST_GID,
            image: image_ref.to_string(),
            imageheight: self.image.height(),
            imagewidth: self.image.width(),
            margin: 0,
            name: name.to_string(),
            spacing: 0,
            tilecount: self.index.len() as u32,
            tileheight: self.cell_height,
            tilewidth: self.cell_width,
        }
    }
}

/// Rasterize and texture every catalog tile in order, then pack them row-major.
///
/// Tiles are pasted top-left in their cell; shorter tiles leave transparent padding
/// below them. Cells never overlap, so pasting is a plain pixel copy.
pub fn compose(catalog: &TileCatalog, options: &SheetOptions, seeds: &TileSeeds) -> Result<SpriteSheet> {
    let index = SpriteSheetIndex::from_catalog(catalog, options.tiles_per_row)?;
    let cell_width = options.tile_width;
    let cell_height = catalog.max_canvas_height(options.tile_height)?;
    let sheet_width = options.tiles_per_row.checked_mul(cell_width);
    let sheet_height = index.rows().checked_mul(cell_height);
    let (Some(sheet_width), Some(sheet_height)) = (sheet_width, sheet_height) else {
        return Err(Error::InvalidConfig(format!(
            "{} tiles of {}x{} in rows of {} do not fit in one image",
            index.len(),
            cell_width,
            cell_height,
            options.tiles_per_row
        )));
    };

    let mut tiles = Vec::with_capacity(catalog.len());
    for def in catalog.iter() {
        let shape = draw_shape(
            def.shape,
            options.tile_width,
            options.tile_height,
            def.color,
            def.outline,
        )?;
        let mut rng = seeds.rng_for(&def.name);
        let tile = apply_texture(shape, def.texture, def.color, &options.texture, &mut rng);
        debug!(tile = %def.name, shape = %def.shape, texture = %def.texture, "rendered tile");
        tiles.push(tile);
    }

    let mut image = RgbaImage::new(sheet_width, sheet_height);
    for (slot, tile) in tiles.iter().enumerate() {
        let (col, row) = index.position(slot);
        imageops::replace(
            &mut image,
            tile,
            (col * cell_width) as i64,
            (row * cell_height) as i64,
        );
    }

    Ok(SpriteSheet {
        image,
        index,
        tiles,
        cell_width,
        cell_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TileDefinition;
    use crate::shapes::ShapeKind;
    use crate::texture::TextureKind;

    fn office_sheet() -> SpriteSheet {
        compose(&TileCatalog::office(), &SheetOptions::default(), &TileSeeds::from_master(42)).unwrap()
    }

    #[test]
    fn test_index_is_bijective_over_catalog() {
        let catalog = TileCatalog::office();
        let sheet = office_sheet();
        assert_eq!(sheet.index.len(), catalog.len());

        let mut seen = vec![false; catalog.len()];
        for (i, def) in catalog.iter().enumerate() {
            let slot = sheet.index.slot(&def.name).unwrap();
            assert_eq!(slot, i);
            assert!(!seen[slot]);
            seen[slot] = true;
            assert_eq!(sheet.index.name(slot), Some(def.name.as_str()));
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_slot_positions_row_major() {
        let index = SpriteSheetIndex::new((0..11).map(|i| format!("t{}", i)), 4).unwrap();
        for slot in 0..11 {
            let (col, row) = index.position(slot);
            assert_eq!(col, slot as u32 % 4);
            assert_eq!(row, slot as u32 / 4);
        }
        assert_eq!(index.rows(), 3);
    }

    #[test]
    fn test_sheet_dimensions() {
        let sheet = office_sheet();
        // 4 columns × 64 px, ceil(11 / 4) = 3 rows × 64 px.
        assert_eq!(sheet.image.dimensions(), (256, 192));
        assert_eq!(sheet.cell_height, 64);

        let options = SheetOptions {
            tiles_per_row: 5,
            ..SheetOptions::default()
        };
        let sheet = compose(&TileCatalog::office(), &options, &TileSeeds::from_master(1)).unwrap();
        assert_eq!(sheet.image.dimensions(), (320, 192));
    }

    #[test]
    fn test_floor_only_sheet_uses_floor_height() {
        let catalog = TileCatalog::new(vec![
            TileDefinition::new("a", ShapeKind::FloorDiamond, TextureKind::None, [1, 2, 3], None),
            TileDefinition::new("b", ShapeKind::FloorDiamond, TextureKind::TileSeam, [4, 5, 6], None),
        ])
        .unwrap();
        let sheet = compose(&catalog, &SheetOptions::default(), &TileSeeds::from_master(0)).unwrap();
        assert_eq!(sheet.image.dimensions(), (256, 32));
    }

    #[test]
    fn test_tile_ids_are_slot_plus_one() {
        let sheet = office_sheet();
        assert_eq!(sheet.index.tile_id("wood_light").unwrap(), 1);
        assert_eq!(sheet.index.tile_id("wall_office").unwrap(), 9);
        assert_eq!(sheet.index.tile_id("door").unwrap(), 11);
        assert!(matches!(
            sheet.index.tile_id("window"),
            Err(Error::IndexResolution(_))
        ));
    }

    #[test]
    fn test_check_id() {
        let sheet = office_sheet();
        assert!(sheet.index.check_id(0).is_ok());
        assert!(sheet.index.check_id(11).is_ok());
        assert!(matches!(sheet.index.check_id(12), Err(Error::IndexResolution(_))));
    }

    fn cell_at(sheet: &SpriteSheet, col: u32, row: u32) -> RgbaImage {
        let (x, y) = (col * sheet.cell_width, row * sheet.cell_height);
        imageops::crop_imm(&sheet.image, x, y, sheet.cell_width, sheet.cell_height).to_image()
    }

    #[test]
    fn test_oversized_sheet_is_rejected() {
        let options = SheetOptions {
            tiles_per_row: 1 << 27,
            ..SheetOptions::default()
        };
        let result = compose(&TileCatalog::office(), &options, &TileSeeds::from_master(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let options = SheetOptions {
            tile_height: u32::MAX / 2 + 1,
            ..SheetOptions::default()
        };
        let result = compose(&TileCatalog::office(), &options, &TileSeeds::from_master(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_tiles_pasted_top_left_with_padding() {
        let sheet = office_sheet();
        // Slot 0 (floor) sits in the upper half of its cell; the lower half is padding.
        let cell = cell_at(&sheet, 0, 0);
        assert_eq!(cell.dimensions(), (64, 64));
        assert_eq!(cell.get_pixel(32, 16)[3], 255);
        assert!(cell.enumerate_pixels().filter(|(_, y, _)| *y >= 32).all(|(_, _, p)| p[3] == 0));

        // Cells round-trip to the individual tile images.
        for (slot, tile) in sheet.tiles.iter().enumerate() {
            let (col, row) = sheet.index.position(slot);
            let cell = cell_at(&sheet, col, row);
            for (x, y, p) in tile.enumerate_pixels() {
                assert_eq!(cell.get_pixel(x, y), p);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sheet() {
        let a = office_sheet();
        let b = office_sheet();
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn test_descriptor() {
        let sheet = office_sheet();
        let d = sheet.descriptor("office-tiles", "../tilesets/office-tileset.png");
        assert_eq!(d.columns, 4);
        assert_eq!(d.firstgid, 1);
        assert_eq!(d.tilecount, 11);
        assert_eq!((d.imagewidth, d.imageheight), (256, 192));
        assert_eq!((d.tilewidth, d.tileheight), (64, 64));
        assert_eq!((d.margin, d.spacing), (0, 0));
    }

    #[test]
    fn test_zero_tiles_per_row_rejected() {
        let options = SheetOptions {
            tiles_per_row: 0,
            ..SheetOptions::default()
        };
        let result = compose(&TileCatalog::office(), &options, &TileSeeds::from_master(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}

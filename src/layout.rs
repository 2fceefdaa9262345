//! Zone-driven painting of the floor and wall layers.
//!
//! A layout is data: a grid size, a default floor tile and an ordered list of paint
//! zones. Zones are applied strictly in order and each one overwrites every cell it
//! covers, so a later zone always wins where two overlap.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::spritesheet::SpriteSheetIndex;
use crate::tilemap::Tilemap;

/// Which layer a zone paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerTarget {
    Floor,
    Wall,
}

/// Cells covered by a zone. Ranges are inclusive at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneRegion {
    Rect {
        rows: (usize, usize),
        cols: (usize, usize),
    },
    /// Horizontal line along one row.
    Row { row: usize, cols: (usize, usize) },
    /// Vertical line down one column.
    Column { col: usize, rows: (usize, usize) },
    Point { row: usize, col: usize },
}

impl ZoneRegion {
    pub fn rect(rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) -> Self {
        ZoneRegion::Rect {
            rows: (*rows.start(), *rows.end()),
            cols: (*cols.start(), *cols.end()),
        }
    }

    pub fn row(row: usize, cols: RangeInclusive<usize>) -> Self {
        ZoneRegion::Row {
            row,
            cols: (*cols.start(), *cols.end()),
        }
    }

    pub fn column(col: usize, rows: RangeInclusive<usize>) -> Self {
        ZoneRegion::Column {
            col,
            rows: (*rows.start(), *rows.end()),
        }
    }

    pub fn point(row: usize, col: usize) -> Self {
        ZoneRegion::Point { row, col }
    }

    /// `(rows, cols)` spans of the region.
    fn spans(&self) -> ((usize, usize), (usize, usize)) {
        match *self {
            ZoneRegion::Rect { rows, cols } => (rows, cols),
            ZoneRegion::Row { row, cols } => ((row, row), cols),
            ZoneRegion::Column { col, rows } => (rows, (col, col)),
            ZoneRegion::Point { row, col } => ((row, row), (col, col)),
        }
    }

    /// The whole region lies inside a `width` × `height` grid and is non-empty.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        let ((r0, r1), (c0, c1)) = self.spans();
        r0 <= r1 && c0 <= c1 && r1 < height && c1 < width
    }

    /// Covered `(row, col)` cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let ((r0, r1), (c0, c1)) = self.spans();
        (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| (r, c)))
    }
}

impl fmt::Display for ZoneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ZoneRegion::Rect { rows, cols } => write!(
                f,
                "rect rows {}..={} cols {}..={}",
                rows.0, rows.1, cols.0, cols.1
            ),
            ZoneRegion::Row { row, cols } => write!(f, "row {} cols {}..={}", row, cols.0, cols.1),
            ZoneRegion::Column { col, rows } => {
                write!(f, "column {} rows {}..={}", col, rows.0, rows.1)
            }
            ZoneRegion::Point { row, col } => write!(f, "point ({}, {})", row, col),
        }
    }
}

/// What a zone stamps: a tile name resolved through the sheet index, or a raw layer ID.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ZoneTile {
    Id(u32),
    Name(String),
}

impl ZoneTile {
    fn resolve(&self, index: &SpriteSheetIndex) -> Result<u32> {
        match self {
            ZoneTile::Id(id) => index.check_id(*id),
            ZoneTile::Name(name) => index.tile_id(name),
        }
    }
}

impl fmt::Display for ZoneTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneTile::Id(id) => write!(f, "#{}", id),
            ZoneTile::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaintZone {
    pub layer: LayerTarget,
    pub region: ZoneRegion,
    pub tile: ZoneTile,
}

impl PaintZone {
    pub fn floor(region: ZoneRegion, tile: &str) -> Self {
        Self {
            layer: LayerTarget::Floor,
            region,
            tile: ZoneTile::Name(tile.to_string()),
        }
    }

    pub fn wall(region: ZoneRegion, tile: &str) -> Self {
        Self {
            layer: LayerTarget::Wall,
            region,
            tile: ZoneTile::Name(tile.to_string()),
        }
    }

    /// Stamp a raw layer ID instead of a named tile. The ID is still checked against
    /// the sheet index when the zone is applied.
    pub fn with_id(layer: LayerTarget, region: ZoneRegion, id: u32) -> Self {
        Self {
            layer,
            region,
            tile: ZoneTile::Id(id),
        }
    }
}

/// Floor and wall layers after every zone has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintedLayout {
    pub floor: Tilemap<u32>,
    pub wall: Tilemap<u32>,
}

impl PaintedLayout {
    pub fn floor_data(&self) -> Vec<u32> {
        self.floor.as_flat().to_vec()
    }

    pub fn wall_data(&self) -> Vec<u32> {
        self.wall.as_flat().to_vec()
    }
}

/// Applies zones one at a time against a pair of layer grids.
///
/// Each `apply` either paints its whole region or fails without touching either grid.
pub struct LayoutPainter<'a> {
    index: &'a SpriteSheetIndex,
    floor: Tilemap<u32>,
    wall: Tilemap<u32>,
}

impl<'a> LayoutPainter<'a> {
    /// Start with the floor covered in `default_floor` and no walls.
    pub fn new(
        width: usize,
        height: usize,
        default_floor: &str,
        index: &'a SpriteSheetIndex,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "layout grid must not be empty, got {}x{}",
                width, height
            )));
        }
        let floor_id = index.tile_id(default_floor)?;
        Ok(Self {
            index,
            floor: Tilemap::new_with(width, height, floor_id),
            wall: Tilemap::new(width, height),
        })
    }

    pub fn apply(&mut self, zone: &PaintZone) -> Result<()> {
        let id = zone.tile.resolve(self.index)?;

        let grid = match zone.layer {
            LayerTarget::Floor => &mut self.floor,
            LayerTarget::Wall => &mut self.wall,
        };
        if !zone.region.fits(grid.width, grid.height) {
            return Err(Error::RegionBounds {
                region: zone.region.to_string(),
                width: grid.width,
                height: grid.height,
            });
        }

        for (row, col) in zone.region.cells() {
            grid.set(col, row, id);
        }
        debug!(layer = ?zone.layer, region = %zone.region, tile = %zone.tile, id, "painted zone");
        Ok(())
    }

    pub fn floor(&self) -> &Tilemap<u32> {
        &self.floor
    }

    pub fn wall(&self) -> &Tilemap<u32> {
        &self.wall
    }

    pub fn finish(self) -> PaintedLayout {
        PaintedLayout {
            floor: self.floor,
            wall: self.wall,
        }
    }
}

/// Paint a `width` × `height` layout by applying `zones` in order.
pub fn paint(
    width: usize,
    height: usize,
    default_floor: &str,
    zones: &[PaintZone],
    index: &SpriteSheetIndex,
) -> Result<PaintedLayout> {
    let mut painter = LayoutPainter::new(width, height, default_floor, index)?;
    for zone in zones {
        painter.apply(zone)?;
    }
    Ok(painter.finish())
}

/// A complete, declarative layout description.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LayoutPlan {
    pub width: usize,
    pub height: usize,
    pub default_floor: String,
    pub zones: Vec<PaintZone>,
}

impl LayoutPlan {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn paint(&self, index: &SpriteSheetIndex) -> Result<PaintedLayout> {
        paint(self.width, self.height, &self.default_floor, &self.zones, index)
    }

    /// The 26×26 office floor plan.
    ///
    /// Grey tile corridor around the edge, six workstation areas in a 3×2 block, a
    /// mixed designer/analyst strip below them, white walkways between areas, an
    /// exterior wall ring and low interior partitions.
    pub fn office() -> Self {
        const N: usize = 26;
        let last = N - 1;

        let zones = vec![
            // Perimeter corridor.
            PaintZone::floor(ZoneRegion::rect(0..=2, 0..=last), "tile_gray"),
            PaintZone::floor(ZoneRegion::rect(23..=last, 0..=last), "tile_gray"),
            PaintZone::floor(ZoneRegion::rect(3..=22, 0..=2), "tile_gray"),
            PaintZone::floor(ZoneRegion::rect(3..=22, 23..=last), "tile_gray"),
            // Lead's desk: dark wood with a red rug in the middle.
            PaintZone::floor(ZoneRegion::rect(7..=10, 5..=8), "wood_dark"),
            PaintZone::floor(ZoneRegion::rect(8..=9, 6..=7), "carpet_red"),
            // Research.
            PaintZone::floor(ZoneRegion::rect(8..=9, 11..=14), "carpet_blue"),
            // Inspection.
            PaintZone::floor(ZoneRegion::rect(7..=10, 17..=20), "tile_white"),
            // Reception.
            PaintZone::floor(ZoneRegion::rect(12..=15, 5..=8), "carpet_green"),
            // Engineering.
            PaintZone::floor(ZoneRegion::rect(12..=15, 11..=14), "concrete"),
            // Writing.
            PaintZone::floor(ZoneRegion::rect(12..=15, 17..=20), "wood_dark"),
            // Design and analysis.
            PaintZone::floor(ZoneRegion::rect(17..=20, 5..=8), "wood_light"),
            PaintZone::floor(ZoneRegion::rect(17..=20, 11..=14), "tile_gray"),
            // Walkways.
            PaintZone::floor(ZoneRegion::row(11, 3..=22), "tile_white"),
            PaintZone::floor(ZoneRegion::row(16, 3..=22), "tile_white"),
            PaintZone::floor(ZoneRegion::column(9, 3..=22), "tile_white"),
            PaintZone::floor(ZoneRegion::column(15, 3..=22), "tile_white"),
            // Exterior walls.
            PaintZone::wall(ZoneRegion::row(0, 0..=last), "wall_office"),
            PaintZone::wall(ZoneRegion::row(last, 0..=last), "wall_office"),
            PaintZone::wall(ZoneRegion::column(0, 0..=last), "wall_office"),
            PaintZone::wall(ZoneRegion::column(last, 0..=last), "wall_office"),
            // Partitions.
            PaintZone::wall(ZoneRegion::row(6, 4..=9), "wall_office"),
            PaintZone::wall(ZoneRegion::row(16, 4..=9), "wall_office"),
            PaintZone::wall(ZoneRegion::row(6, 16..=21), "wall_office"),
            PaintZone::wall(ZoneRegion::column(10, 7..=10), "wall_office"),
            PaintZone::wall(ZoneRegion::column(16, 7..=10), "wall_office"),
        ];

        Self {
            width: N,
            height: N,
            default_floor: "wood_light".to_string(),
            zones,
        }
    }
}

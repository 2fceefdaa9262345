//! Isometric tile silhouettes: floor diamonds, wall blocks and doors.
//!
//! Every shape is sized from the base floor tile (`width` × `height`). Floors occupy
//! exactly that box; walls and doors are twice as tall so they rise above the floor
//! they stand on.

use std::fmt;
use std::str::FromStr;

use crate::canvas::{self, Canvas, Point, Rgb};
use crate::error::{Error, Result};

/// Wall surface treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallStyle {
    /// Partition-panel wall: diamond top over a vertical body, with panel seams.
    Office,
    /// Solid block covered in a staggered brick pattern.
    Brick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    FloorDiamond,
    Wall(WallStyle),
    Door,
}

impl ShapeKind {
    /// Canvas height for this shape given the base floor tile height.
    pub fn canvas_height(&self, tile_height: u32) -> Result<u32> {
        match self {
            ShapeKind::FloorDiamond => Ok(tile_height),
            ShapeKind::Wall(_) | ShapeKind::Door => tile_height.checked_mul(2).ok_or_else(|| {
                Error::InvalidConfig(format!("tile height {} is too large for {}", tile_height, self))
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::FloorDiamond => "floor",
            ShapeKind::Wall(WallStyle::Office) => "wall_office",
            ShapeKind::Wall(WallStyle::Brick) => "wall_brick",
            ShapeKind::Door => "door",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "floor" | "floor_diamond" => Ok(ShapeKind::FloorDiamond),
            "wall_office" => Ok(ShapeKind::Wall(WallStyle::Office)),
            "wall_brick" => Ok(ShapeKind::Wall(WallStyle::Brick)),
            "door" => Ok(ShapeKind::Door),
            other => Err(Error::Shape(format!("unsupported shape kind '{}'", other))),
        }
    }
}

const OFFICE_PANEL_SEAM: Rgb = [200, 200, 210];
const OFFICE_PANEL_SEAMS: u32 = 4;

const BRICK_COLOR: Rgb = [160, 120, 100];
const BRICK_ROWS: u32 = 8;
const BRICK_COLS: u32 = 3;
// Brick geometry for a 64 px wide tile with 8 px courses; other sizes scale from it.
const BRICK_REFERENCE_WIDTH: i64 = 64;
const BRICK_REFERENCE_COURSE: i64 = 8;
const BRICK_PITCH_X: i64 = 24;
const BRICK_STAGGER: i64 = 16;
const BRICK_WIDTH: i64 = 20;
const BRICK_HEIGHT: i64 = 6;

const DOOR_HALF_WIDTH: f32 = 10.0;
const DOOR_HANDLE_OFFSET: i32 = 5;
const DOOR_HANDLE_RADIUS: i32 = 2;
const DOOR_HANDLE_COLOR: Rgb = [255, 215, 0];

/// Corner points of the isometric diamond filling a `width` × `height` box:
/// top, right, bottom, left.
pub fn diamond(width: u32, height: u32) -> [Point; 4] {
    let (w, h) = (width as f32, height as f32);
    [
        ((width / 2) as f32, 0.0),
        (w, (height / 2) as f32),
        ((width / 2) as f32, h),
        (0.0, (height / 2) as f32),
    ]
}

/// Rasterize one tile shape onto a fresh transparent canvas.
///
/// `width` × `height` is the base floor tile. Walls and doors get a canvas twice as
/// tall; floors outline in `outline` when given.
pub fn draw_shape(
    kind: ShapeKind,
    width: u32,
    height: u32,
    fill: Rgb,
    outline: Option<Rgb>,
) -> Result<Canvas> {
    if width == 0 || height == 0 {
        return Err(Error::Shape(format!(
            "cannot draw {} on a {}x{} tile",
            kind, width, height
        )));
    }
    kind.canvas_height(height)?;

    match kind {
        ShapeKind::FloorDiamond => Ok(draw_floor(width, height, fill, outline)),
        ShapeKind::Wall(WallStyle::Office) => Ok(draw_office_wall(width, height, fill, outline)),
        ShapeKind::Wall(WallStyle::Brick) => Ok(draw_brick_wall(width, height, fill, outline)),
        ShapeKind::Door => draw_door(width, height, fill, outline),
    }
}

fn draw_floor(width: u32, height: u32, fill: Rgb, outline: Option<Rgb>) -> Canvas {
    let mut img = canvas::blank(width, height);
    let points = diamond(width, height);

    canvas::fill_polygon(&mut img, &points, canvas::opaque(fill));
    if let Some(line) = outline {
        canvas::stroke_polygon(&mut img, &points, canvas::opaque(line));
    }
    img
}

/// Hexagonal silhouette: the floor diamond's top half, dropped vertically by one tile height.
fn office_wall_outline(width: u32, height: u32) -> [Point; 6] {
    let (w, h) = (width as f32, height as f32);
    [
        ((width / 2) as f32, 0.0),
        (w, h),
        (w, h * 2.0),
        ((width / 2) as f32, h * 1.5),
        (0.0, h * 2.0),
        (0.0, h),
    ]
}

fn draw_office_wall(width: u32, height: u32, fill: Rgb, outline: Option<Rgb>) -> Canvas {
    let mut img = canvas::blank(width, height * 2);
    let points = office_wall_outline(width, height);

    canvas::fill_polygon(&mut img, &points, canvas::opaque(fill));
    if let Some(line) = outline {
        canvas::stroke_polygon(&mut img, &points, canvas::opaque(line));
    }

    // Panel seams split the lower body evenly, only where the wall is solid.
    let seam = canvas::opaque(OFFICE_PANEL_SEAM);
    let spacing = (height / OFFICE_PANEL_SEAMS).max(1);
    for i in 0..OFFICE_PANEL_SEAMS {
        let y = height + i * spacing;
        if y >= img.height() {
            break;
        }
        for x in 0..width {
            if img.get_pixel(x, y)[3] > 0 {
                img.put_pixel(x, y, seam);
            }
        }
    }
    img
}

#[derive(Debug, PartialEq, Eq)]
struct BrickLayout {
    course: i32,
    pitch: i32,
    stagger: i32,
    brick_width: i32,
    brick_height: i32,
}

/// Brick sizes for a `width` × `canvas_height` wall. A brick stays shorter than its
/// course whenever the course is at least 2 px.
fn brick_layout(width: u32, canvas_height: u32) -> BrickLayout {
    let course = i64::from((canvas_height / BRICK_ROWS).max(1));
    let across = |v: i64| (v * i64::from(width) / BRICK_REFERENCE_WIDTH) as i32;
    BrickLayout {
        course: course as i32,
        pitch: across(BRICK_PITCH_X).max(1),
        stagger: across(BRICK_STAGGER),
        brick_width: across(BRICK_WIDTH).max(1),
        brick_height: (BRICK_HEIGHT * course / BRICK_REFERENCE_COURSE).max(1) as i32,
    }
}

fn draw_brick_wall(width: u32, height: u32, fill: Rgb, outline: Option<Rgb>) -> Canvas {
    let canvas_height = height * 2;
    let mut img = canvas::blank(width, canvas_height);
    let right = width as i32 - 1;
    let bottom = canvas_height as i32 - 1;

    canvas::fill_rect(&mut img, 0, 0, right, bottom, canvas::opaque(fill));

    let mortar = canvas::opaque(outline.unwrap_or(BRICK_COLOR));
    let bricks = brick_layout(width, canvas_height);
    for row in 0..BRICK_ROWS as i32 {
        let y = row * bricks.course;
        let offset = if row % 2 == 0 { bricks.stagger } else { 0 };
        for col in 0..BRICK_COLS as i32 {
            let x = col * bricks.pitch + offset;
            if x < width as i32 {
                canvas::stroke_rect(
                    &mut img,
                    x,
                    y,
                    (x + bricks.brick_width).min(right),
                    (y + bricks.brick_height).min(bottom),
                    mortar,
                );
            }
        }
    }
    img
}

fn draw_door(width: u32, height: u32, fill: Rgb, outline: Option<Rgb>) -> Result<Canvas> {
    let needed = (DOOR_HALF_WIDTH as u32 + 1) * 2;
    if width < needed {
        return Err(Error::Shape(format!(
            "door needs a tile at least {} px wide, got {}",
            needed, width
        )));
    }

    let mut img = canvas::blank(width, height * 2);
    let cx = (width / 2) as f32;
    let h = height as f32;

    let leaf = [
        (cx - DOOR_HALF_WIDTH, (height / 2) as f32),
        (cx + DOOR_HALF_WIDTH, (height / 2) as f32),
        (cx + DOOR_HALF_WIDTH, h * 1.5),
        (cx - DOOR_HALF_WIDTH, h * 1.5),
    ];
    canvas::fill_polygon(&mut img, &leaf, canvas::opaque(fill));
    if let Some(line) = outline {
        canvas::stroke_polygon(&mut img, &leaf, canvas::opaque(line));
    }

    let hx = (width / 2) as i32 + DOOR_HANDLE_OFFSET;
    let hy = height as i32;
    canvas::fill_ellipse(
        &mut img,
        hx - DOOR_HANDLE_RADIUS,
        hy - DOOR_HANDLE_RADIUS,
        hx + DOOR_HANDLE_RADIUS,
        hy + DOOR_HANDLE_RADIUS,
        canvas::opaque(DOOR_HANDLE_COLOR),
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::opaque_pixel_count;

    const FILL: Rgb = [205, 170, 125];
    const EDGE: Rgb = [0, 0, 0];

    #[test]
    fn test_floor_dimensions_and_transparent_corners() {
        let tile = draw_shape(ShapeKind::FloorDiamond, 64, 32, FILL, Some(EDGE)).unwrap();
        assert_eq!(tile.dimensions(), (64, 32));
        for &(x, y) in &[(0, 0), (63, 0), (0, 31), (63, 31), (8, 2), (55, 29)] {
            assert_eq!(tile.get_pixel(x, y)[3], 0, "({}, {}) should be transparent", x, y);
        }
        assert_eq!(tile.get_pixel(32, 16).0, [205, 170, 125, 255]);
    }

    #[test]
    fn test_floor_outline_on_top_of_fill() {
        let tile = draw_shape(ShapeKind::FloorDiamond, 64, 32, FILL, Some(EDGE)).unwrap();
        // Top vertex sits on the outline.
        assert_eq!(tile.get_pixel(32, 0).0, [0, 0, 0, 255]);
        // Left vertex too.
        assert_eq!(tile.get_pixel(0, 16).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_floor_without_outline_is_single_color() {
        let tile = draw_shape(ShapeKind::FloorDiamond, 64, 32, FILL, None).unwrap();
        assert!(tile
            .pixels()
            .filter(|p| p[3] > 0)
            .all(|p| p.0 == [205, 170, 125, 255]));
        // Roughly half the bounding box is covered by a diamond.
        let covered = opaque_pixel_count(&tile);
        assert!(covered > 900 && covered < 1200, "covered {}", covered);
    }

    #[test]
    fn test_walls_and_doors_are_double_height() {
        for kind in [
            ShapeKind::Wall(WallStyle::Office),
            ShapeKind::Wall(WallStyle::Brick),
            ShapeKind::Door,
        ] {
            let tile = draw_shape(kind, 64, 32, [139, 90, 60], Some([100, 60, 40])).unwrap();
            assert_eq!(tile.dimensions(), (64, 64), "{}", kind);
            assert_eq!(kind.canvas_height(32).unwrap(), 64);
        }
    }

    #[test]
    fn test_office_wall_silhouette() {
        let tile = draw_shape(
            ShapeKind::Wall(WallStyle::Office),
            64,
            32,
            [220, 220, 230],
            Some([180, 180, 190]),
        )
        .unwrap();
        // Above the diamond top the corners are empty.
        assert_eq!(tile.get_pixel(2, 2)[3], 0);
        // The notch under the front edge (below 1.5 × height at the centre) is empty.
        assert_eq!(tile.get_pixel(32, 60)[3], 0);
        // Body is solid at the side columns.
        assert_eq!(tile.get_pixel(4, 45)[3], 255);
        // First panel seam row.
        assert_eq!(tile.get_pixel(20, 32).0, [200, 200, 210, 255]);
    }

    #[test]
    fn test_brick_wall_fills_whole_canvas() {
        let tile = draw_shape(ShapeKind::Wall(WallStyle::Brick), 64, 32, [180, 140, 120], None)
            .unwrap();
        assert_eq!(opaque_pixel_count(&tile), 64 * 64);
        // Mortar on the first course, staggered by 16.
        assert_eq!(tile.get_pixel(16, 0).0, [160, 120, 100, 255]);
        // Second course starts at the left edge.
        assert_eq!(tile.get_pixel(0, 8).0, [160, 120, 100, 255]);
    }

    #[test]
    fn test_small_brick_wall_keeps_courses_apart() {
        let tile = draw_shape(ShapeKind::Wall(WallStyle::Brick), 64, 16, [180, 140, 120], None)
            .unwrap();
        // 4 px courses: the first course's bricks close at y = 3, before the next course.
        assert_eq!(tile.get_pixel(26, 3).0, [160, 120, 100, 255]);
        assert_eq!(tile.get_pixel(26, 2).0, [180, 140, 120, 255]);
    }

    #[test]
    fn test_brick_layout_scales_with_tile() {
        assert_eq!(
            brick_layout(64, 64),
            BrickLayout {
                course: 8,
                pitch: 24,
                stagger: 16,
                brick_width: 20,
                brick_height: 6,
            }
        );
        for (width, height) in [(64, 16), (64, 32), (32, 32), (128, 128), (64, 256)] {
            let bricks = brick_layout(width, height);
            assert!(
                bricks.brick_height < bricks.course,
                "{}x{}: {:?}",
                width,
                height,
                bricks
            );
            assert!(bricks.brick_width < bricks.pitch, "{}x{}: {:?}", width, height, bricks);
        }
    }

    fn seam_rows(tile: &Canvas, x: u32) -> Vec<u32> {
        let seam = canvas::opaque(OFFICE_PANEL_SEAM);
        (0..tile.height()).filter(|&y| *tile.get_pixel(x, y) == seam).collect()
    }

    #[test]
    fn test_office_wall_seams_follow_tile_height() {
        for (height, rows) in [
            (16, vec![16, 20, 24, 28]),
            (32, vec![32, 40, 48, 56]),
            (64, vec![64, 80, 96, 112]),
        ] {
            let tile = draw_shape(
                ShapeKind::Wall(WallStyle::Office),
                64,
                height,
                [220, 220, 230],
                Some([180, 180, 190]),
            )
            .unwrap();
            assert_eq!(seam_rows(&tile, 2), rows, "tile height {}", height);
        }
    }

    #[test]
    fn test_oversized_tile_height_is_rejected() {
        let huge = u32::MAX / 2 + 1;
        assert!(matches!(
            ShapeKind::Door.canvas_height(huge),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(ShapeKind::FloorDiamond.canvas_height(huge).unwrap(), huge);
        let result = draw_shape(ShapeKind::Wall(WallStyle::Office), 64, huge, [1, 2, 3], None);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_door_leaf_and_handle() {
        let tile = draw_shape(ShapeKind::Door, 64, 32, [139, 90, 60], Some([100, 60, 40])).unwrap();
        // Leaf spans x 22..=42, y 16..=48.
        assert_eq!(tile.get_pixel(28, 30).0, [139, 90, 60, 255]);
        assert_eq!(tile.get_pixel(22, 20).0, [100, 60, 40, 255]);
        // Handle at (37, 32).
        assert_eq!(tile.get_pixel(37, 32).0, [255, 215, 0, 255]);
        // Outside the leaf stays clear.
        assert_eq!(tile.get_pixel(5, 32)[3], 0);
        assert_eq!(tile.get_pixel(32, 55)[3], 0);
    }

    #[test]
    fn test_door_too_narrow_is_shape_error() {
        let result = draw_shape(ShapeKind::Door, 16, 8, [139, 90, 60], None);
        assert!(matches!(result, Err(Error::Shape(_))));
    }

    #[test]
    fn test_zero_size_is_shape_error() {
        let result = draw_shape(ShapeKind::FloorDiamond, 0, 32, FILL, None);
        assert!(matches!(result, Err(Error::Shape(_))));
    }

    #[test]
    fn test_shape_kind_parsing() {
        assert_eq!("door".parse::<ShapeKind>().unwrap(), ShapeKind::Door);
        assert_eq!(
            "wall_brick".parse::<ShapeKind>().unwrap(),
            ShapeKind::Wall(WallStyle::Brick)
        );
        assert!(matches!("window".parse::<ShapeKind>(), Err(Error::Shape(_))));
    }
}

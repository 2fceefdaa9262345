//! Surface textures layered on top of rasterized tile shapes.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::canvas::{self, Canvas, Rgb};
use crate::error::{Error, Result};
use crate::shapes::diamond;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    None,
    /// Per-pixel color noise simulating grain.
    Wood,
    /// Thick dark ring around the diamond edge.
    Carpet,
    /// Thin light seam tracing the diamond edge.
    TileSeam,
}

impl TextureKind {
    pub fn name(&self) -> &'static str {
        match self {
            TextureKind::None => "none",
            TextureKind::Wood => "wood",
            TextureKind::Carpet => "carpet",
            TextureKind::TileSeam => "tile_seam",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(TextureKind::None),
            "wood" => Ok(TextureKind::Wood),
            "carpet" => Ok(TextureKind::Carpet),
            "tile_seam" | "tile" => Ok(TextureKind::TileSeam),
            other => Err(Error::Shape(format!("unsupported texture kind '{}'", other))),
        }
    }
}

pub const CARPET_BORDER_COLOR: Rgb = [100, 80, 60];
pub const TILE_SEAM_COLOR: Rgb = [180, 180, 180];

/// Tuning knobs for texture synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureParams {
    /// Wood noise is drawn uniformly from `-grain..=grain` per channel. Only the
    /// magnitude matters and it saturates at 255.
    pub grain: i16,
    /// Number of nested outline passes forming the carpet border.
    pub carpet_border_width: u32,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            grain: 15,
            carpet_border_width: 2,
        }
    }
}

/// Apply `kind` to a tile canvas and hand it back.
///
/// `base_color` is the tile's fill color; wood noise is centred on it rather than on
/// whatever is currently painted, so outline pixels get grain as well. `rng` is the
/// only source of randomness, seed it to make the output reproducible.
pub fn apply_texture<R: Rng>(
    mut canvas: Canvas,
    kind: TextureKind,
    base_color: Rgb,
    params: &TextureParams,
    rng: &mut R,
) -> Canvas {
    match kind {
        TextureKind::None => {}
        TextureKind::Wood => add_wood_grain(&mut canvas, base_color, params.grain, rng),
        TextureKind::Carpet => add_carpet_border(&mut canvas, params.carpet_border_width),
        TextureKind::TileSeam => add_tile_seams(&mut canvas),
    }
    canvas
}

fn add_wood_grain<R: Rng>(canvas: &mut Canvas, base_color: Rgb, grain: i16, rng: &mut R) {
    // Anything past 255 already saturates every channel.
    let grain = grain.unsigned_abs().min(255) as i16;
    for pixel in canvas.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }
        for (channel, &base) in pixel.0.iter_mut().zip(base_color.iter()) {
            let noise = rng.gen_range(-grain..=grain);
            *channel = (base as i16 + noise).clamp(0, 255) as u8;
        }
        pixel[3] = 255;
    }
}

fn add_carpet_border(canvas: &mut Canvas, border_width: u32) {
    let (width, height) = canvas.dimensions();
    let color = canvas::opaque(CARPET_BORDER_COLOR);

    // Each pass moves one row inward; the 2:1 diamond moves two columns per row.
    for pass in 0..border_width {
        let [top, right, bottom, left] = diamond(width, height);
        let inset = pass as f32;
        let ring = [
            (top.0, top.1 + inset),
            (right.0 - 2.0 * inset, right.1),
            (bottom.0, bottom.1 - inset),
            (left.0 + 2.0 * inset, left.1),
        ];
        canvas::stroke_polygon(canvas, &ring, color);
    }
}

fn add_tile_seams(canvas: &mut Canvas) {
    let (width, height) = canvas.dimensions();
    let [top, right, bottom, left] = diamond(width, height);
    canvas::draw_polyline(
        canvas,
        &[top, right, bottom, left, top],
        canvas::opaque(TILE_SEAM_COLOR),
    );
}

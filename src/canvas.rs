//! Pixel drawing primitives on RGBA canvases.
//!
//! All shapes are clipped to the canvas. Vertices are given in floating point and
//! rounded half-up to whole pixels before rasterizing, so that a polygon's fill and
//! its stroked outline always agree on where the edges are.

use image::{Rgba, RgbaImage};

/// A tile image. Freshly created canvases are fully transparent.
pub type Canvas = RgbaImage;

/// A vertex in canvas pixel space.
pub type Point = (f32, f32);

/// An opaque RGB color.
pub type Rgb = [u8; 3];

pub fn blank(width: u32, height: u32) -> Canvas {
    RgbaImage::new(width, height)
}

pub fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// Round half-up to the nearest pixel (1.5 -> 2, 2.5 -> 3, -0.5 -> 0).
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

fn snap(p: Point) -> (i32, i32) {
    (round_half_up(p.0), round_half_up(p.1))
}

/// Set a pixel if it falls inside the canvas.
pub fn put(canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// One-pixel line between two points (Bresenham).
pub fn draw_line(canvas: &mut Canvas, from: Point, to: Point, color: Rgba<u8>) {
    let (mut x0, mut y0) = snap(from);
    let (x1, y1) = snap(to);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(canvas, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Connected line segments through `points`, without closing the loop.
pub fn draw_polyline(canvas: &mut Canvas, points: &[Point], color: Rgba<u8>) {
    for pair in points.windows(2) {
        draw_line(canvas, pair[0], pair[1], color);
    }
}

/// Outline of a closed polygon.
pub fn stroke_polygon(canvas: &mut Canvas, points: &[Point], color: Rgba<u8>) {
    if points.len() < 2 {
        return;
    }
    draw_polyline(canvas, points, color);
    draw_line(canvas, points[points.len() - 1], points[0], color);
}

/// Fill a simple polygon, boundary included.
///
/// Interior pixels come from an even-odd scanline pass; the boundary is then stroked
/// in the fill color so the filled area matches the outline exactly.
pub fn fill_polygon(canvas: &mut Canvas, points: &[Point], color: Rgba<u8>) {
    if points.len() < 3 {
        stroke_polygon(canvas, points, color);
        return;
    }

    let snapped: Vec<(f32, f32)> = points
        .iter()
        .map(|&p| {
            let (x, y) = snap(p);
            (x as f32, y as f32)
        })
        .collect();

    let min_y = snapped.iter().map(|p| p.1).fold(f32::MAX, f32::min).max(0.0) as i32;
    let max_y = snapped
        .iter()
        .map(|p| p.1)
        .fold(f32::MIN, f32::max)
        .min(canvas.height() as f32 - 1.0) as i32;

    let mut crossings: Vec<f32> = Vec::with_capacity(snapped.len());
    for y in min_y..=max_y {
        let yc = y as f32;
        crossings.clear();

        for i in 0..snapped.len() {
            let (x0, y0) = snapped[i];
            let (x1, y1) = snapped[(i + 1) % snapped.len()];
            // Half-open so a shared vertex is counted once.
            if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                crossings.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = span[0].ceil() as i32;
            let end = span[1].floor() as i32;
            for x in start..=end {
                put(canvas, x, y, color);
            }
        }
    }

    stroke_polygon(canvas, points, color);
}

/// Fill the inclusive pixel rectangle `[x0, x1] × [y0, y1]`.
pub fn fill_rect(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            put(canvas, x, y, color);
        }
    }
}

/// Outline the inclusive pixel rectangle `[x0, x1] × [y0, y1]`.
pub fn stroke_rect(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));
    for x in left..=right {
        put(canvas, x, top, color);
        put(canvas, x, bottom, color);
    }
    for y in top..=bottom {
        put(canvas, left, y, color);
        put(canvas, right, y, color);
    }
}

/// Fill the ellipse inscribed in the inclusive pixel box `[x0, x1] × [y0, y1]`.
pub fn fill_ellipse(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let cx = (x0 + x1) as f32 / 2.0;
    let cy = (y0 + y1) as f32 / 2.0;
    // Pixel centres on the box edge count as inside.
    let rx = (x1 - x0).abs() as f32 / 2.0 + 0.5;
    let ry = (y1 - y0).abs() as f32 / 2.0 + 0.5;

    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            let nx = (x as f32 - cx) / rx;
            let ny = (y as f32 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                put(canvas, x, y, color);
            }
        }
    }
}

/// Number of pixels with non-zero alpha.
pub fn opaque_pixel_count(canvas: &Canvas) -> usize {
    canvas.pixels().filter(|p| p[3] > 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(48.0), 48);
        assert_eq!(round_half_up(-0.5), 0);
    }

    #[test]
    fn test_blank_is_transparent() {
        let canvas = blank(8, 4);
        assert_eq!(opaque_pixel_count(&canvas), 0);
    }

    #[test]
    fn test_line_endpoints_inclusive() {
        let mut canvas = blank(10, 10);
        draw_line(&mut canvas, (1.0, 1.0), (8.0, 1.0), RED);
        assert_eq!(opaque_pixel_count(&canvas), 8);
        assert_eq!(*canvas.get_pixel(1, 1), RED);
        assert_eq!(*canvas.get_pixel(8, 1), RED);
    }

    #[test]
    fn test_line_clipped_to_canvas() {
        let mut canvas = blank(4, 4);
        draw_line(&mut canvas, (-5.0, 2.0), (10.0, 2.0), RED);
        assert_eq!(opaque_pixel_count(&canvas), 4);
    }

    #[test]
    fn test_fill_polygon_stays_inside_diamond() {
        let (w, h) = (16.0, 8.0);
        let mut canvas = blank(16, 8);
        let diamond = [(w / 2.0, 0.0), (w, h / 2.0), (w / 2.0, h), (0.0, h / 2.0)];
        fill_polygon(&mut canvas, &diamond, RED);

        // Corners of the bounding box stay transparent.
        for &(x, y) in &[(0, 0), (15, 0), (0, 7), (15, 7)] {
            assert_eq!(canvas.get_pixel(x, y)[3], 0, "corner ({}, {}) was painted", x, y);
        }
        // Centre is filled.
        assert_eq!(*canvas.get_pixel(8, 4), RED);
        // Every row through the middle is contiguous.
        let row: Vec<bool> = (0..16).map(|x| canvas.get_pixel(x, 4)[3] > 0).collect();
        let first = row.iter().position(|&b| b).unwrap();
        let last = row.iter().rposition(|&b| b).unwrap();
        assert!(row[first..=last].iter().all(|&b| b));
    }

    #[test]
    fn test_fill_rect_and_stroke_rect() {
        let mut canvas = blank(6, 6);
        fill_rect(&mut canvas, 1, 1, 3, 2, RED);
        assert_eq!(opaque_pixel_count(&canvas), 6);

        let mut outline = blank(6, 6);
        stroke_rect(&mut outline, 0, 0, 4, 4, RED);
        assert_eq!(opaque_pixel_count(&outline), 16);
        assert_eq!(outline.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn test_fill_ellipse_small_circle() {
        let mut canvas = blank(9, 9);
        fill_ellipse(&mut canvas, 2, 2, 6, 6, RED);
        assert_eq!(*canvas.get_pixel(4, 4), RED);
        assert_eq!(*canvas.get_pixel(4, 2), RED);
        assert_eq!(canvas.get_pixel(2, 2)[3], 0);
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
    }
}

//! Raster drawing primitives used to render kernel results.
//!
//! Everything clips against the raster bounds, so shapes may extend past the
//! edges. Strokes thicker than one pixel are produced by stamping a disc of
//! diameter `thickness` along the path.
use crate::image::{Bgr, ImageView, RasterImage};
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stroke style for outlines; `Filled` paints the interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    Width(u32),
    Filled,
}

pub fn fill_disc(img: &mut RasterImage, cx: f32, cy: f32, radius: f32, color: Bgr) {
    if radius < 0.0 {
        return;
    }
    let r2 = radius * radius;
    let y0 = (cy - radius).floor() as i64;
    let y1 = (cy + radius).ceil() as i64;
    let x0 = (cx - radius).floor() as i64;
    let x1 = (cx + radius).ceil() as i64;
    for y in y0.max(0)..=y1.min(img.height() as i64 - 1) {
        for x in x0.max(0)..=x1.min(img.width() as i64 - 1) {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_clipped(x, y, color);
            }
        }
    }
}

/// Circle outline (or filled disc) centred on `center`.
pub fn draw_circle(img: &mut RasterImage, center: Point, radius: f32, color: Bgr, stroke: Stroke) {
    let (cx, cy) = (center.x as f32, center.y as f32);
    let half = match stroke {
        Stroke::Filled => return fill_disc(img, cx, cy, radius, color),
        Stroke::Width(w) => (w.max(1) as f32) * 0.5,
    };
    let outer = radius + half;
    let inner = (radius - half).max(0.0);
    let (outer2, inner2) = (outer * outer, inner * inner);
    let reach = outer.ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 <= outer2 && (d2 >= inner2 || inner == 0.0) {
                img.put_clipped(center.x as i64 + dx, center.y as i64 + dy, color);
            }
        }
    }
}

/// Bresenham line from `p0` to `p1`, stamped with a round brush.
pub fn draw_line(img: &mut RasterImage, p0: Point, p1: Point, color: Bgr, thickness: u32) {
    let brush = (thickness.max(1) as f32 - 1.0) * 0.5;
    let (mut x, mut y) = (p0.x as i64, p0.y as i64);
    let (x1, y1) = (p1.x as i64, p1.y as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if brush <= 0.0 {
            img.put_clipped(x, y, color);
        } else {
            fill_disc(img, x as f32, y as f32, brush + 0.5, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Connect consecutive points; `closed` also joins the last to the first.
pub fn draw_polyline(img: &mut RasterImage, points: &[Point], closed: bool, color: Bgr, thickness: u32) {
    match points {
        [] => {}
        [p] => draw_line(img, *p, *p, color, thickness),
        _ => {
            for pair in points.windows(2) {
                draw_line(img, pair[0], pair[1], color, thickness);
            }
            if closed {
                draw_line(img, points[points.len() - 1], points[0], color, thickness);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(img: &RasterImage, color: Bgr) -> usize {
        img.pixels().filter(|&p| p == color).count()
    }

    #[test]
    fn thin_line_touches_both_endpoints() {
        let mut img = RasterImage::new(10, 10);
        draw_line(&mut img, Point::new(1, 1), Point::new(8, 5), Bgr::RED, 1);
        assert_eq!(img.pixel(1, 1), Bgr::RED);
        assert_eq!(img.pixel(8, 5), Bgr::RED);
        assert_eq!(count(&img, Bgr::RED), 8);
    }

    #[test]
    fn shapes_clip_at_borders() {
        let mut img = RasterImage::new(8, 8);
        draw_circle(&mut img, Point::new(0, 0), 5.0, Bgr::WHITE, Stroke::Width(3));
        draw_line(&mut img, Point::new(-5, 3), Point::new(20, 3), Bgr::RED, 2);
        assert_eq!(img.pixel(7, 3), Bgr::RED);
        assert_eq!(img.pixel(0, 7), Bgr::BLACK);
    }

    #[test]
    fn stroked_circle_leaves_centre_empty() {
        let mut img = RasterImage::new(21, 21);
        draw_circle(&mut img, Point::new(10, 10), 7.0, Bgr::MAGENTA, Stroke::Width(1));
        assert_eq!(img.pixel(10, 10), Bgr::BLACK);
        assert_eq!(img.pixel(17, 10), Bgr::MAGENTA);
        assert_eq!(img.pixel(10, 3), Bgr::MAGENTA);
    }

    #[test]
    fn filled_circle_covers_centre() {
        let mut img = RasterImage::new(9, 9);
        draw_circle(&mut img, Point::new(4, 4), 2.0, Bgr::WHITE, Stroke::Filled);
        assert_eq!(img.pixel(4, 4), Bgr::WHITE);
        assert_eq!(img.pixel(4, 6), Bgr::WHITE);
        assert_eq!(img.pixel(4, 7), Bgr::BLACK);
    }

    #[test]
    fn closed_polyline_joins_endpoints() {
        let mut img = RasterImage::new(10, 10);
        let pts = [Point::new(1, 1), Point::new(8, 1), Point::new(8, 8), Point::new(1, 8)];
        draw_polyline(&mut img, &pts, true, Bgr::RED, 1);
        assert_eq!(img.pixel(1, 5), Bgr::RED);
        assert_eq!(count(&img, Bgr::RED), 28);
    }
}

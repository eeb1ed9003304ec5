//! FAST-9 segment test corner detector.
//!
//! A pixel is a corner when 9 contiguous pixels on the 16-pixel Bresenham
//! circle of radius 3 are all brighter than `centre + threshold` or all
//! darker than `centre - threshold`. The score of a corner is the largest
//! margin over all qualifying arcs; a 3×3 non-maximum suppression on that
//! score keeps one response per corner.
use crate::image::{GrayImage, ImageView};

const CIRCLE: [(isize, isize); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

const ARC: usize = 9;

/// Distance from the image edge at which the circle still fits.
pub const FAST_RADIUS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

/// Largest margin `m` such that some 9-arc is uniformly brighter or darker
/// than the centre by more than `m`. Zero when no arc qualifies.
fn segment_score(img: &GrayImage, x: usize, y: usize) -> i32 {
    let c = img.get(x, y) as i32;
    let mut diffs = [0i32; 16];
    for (d, &(dx, dy)) in diffs.iter_mut().zip(CIRCLE.iter()) {
        let v = img.get((x as isize + dx) as usize, (y as isize + dy) as usize) as i32;
        *d = v - c;
    }
    let mut best = 0;
    for start in 0..16 {
        let mut bright = i32::MAX;
        let mut dark = i32::MAX;
        for k in 0..ARC {
            let d = diffs[(start + k) % 16];
            bright = bright.min(d);
            dark = dark.min(-d);
        }
        best = best.max(bright).max(dark);
    }
    best
}

/// Quick rejection on the four compass points: a 9-arc always covers at
/// least two of them.
#[inline]
fn passes_compass_test(img: &GrayImage, x: usize, y: usize, threshold: i32) -> bool {
    let c = img.get(x, y) as i32;
    let mut brighter = 0;
    let mut darker = 0;
    for &i in &[0usize, 4, 8, 12] {
        let (dx, dy) = CIRCLE[i];
        let v = img.get((x as isize + dx) as usize, (y as isize + dy) as usize) as i32;
        if v > c + threshold {
            brighter += 1;
        } else if v < c - threshold {
            darker += 1;
        }
    }
    brighter >= 2 || darker >= 2
}

/// Detect FAST-9 corners whose margin exceeds `threshold`, restricted to
/// pixels at least `border` away from every edge (never less than the
/// circle radius).
pub fn detect_fast(img: &GrayImage, threshold: u8, border: usize, nonmax: bool) -> Vec<Corner> {
    let border = border.max(FAST_RADIUS);
    let (w, h) = (img.width(), img.height());
    if w <= 2 * border || h <= 2 * border {
        return Vec::new();
    }
    let t = threshold as i32;
    let mut scores = vec![0i32; w * h];
    for y in border..h - border {
        for x in border..w - border {
            if !passes_compass_test(img, x, y, t) {
                continue;
            }
            let s = segment_score(img, x, y);
            if s > t {
                scores[y * w + x] = s;
            }
        }
    }

    let mut corners = Vec::new();
    for y in border..h - border {
        for x in border..w - border {
            let s = scores[y * w + x];
            if s == 0 {
                continue;
            }
            if nonmax && !is_local_max(&scores, w, x, y) {
                continue;
            }
            corners.push(Corner {
                x,
                y,
                score: s as f32,
            });
        }
    }
    corners
}

/// Strict against earlier neighbours in scan order, non-strict against later
/// ones, so plateaus keep exactly their first pixel.
fn is_local_max(scores: &[i32], w: usize, x: usize, y: usize) -> bool {
    let s = scores[y * w + x];
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let n = scores[(y as isize + dy) as usize * w + (x as isize + dx) as usize];
            let earlier = dy < 0 || (dy == 0 && dx < 0);
            if (earlier && n >= s) || (!earlier && n > s) {
                return false;
            }
        }
    }
    true
}

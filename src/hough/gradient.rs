//! Gradient Hough transform for circles.
//!
//! Every Canny edge pixel casts one vote per radius in `[min_radius,
//! max_radius]` on both sides of its gradient direction, deposited
//! bilinearly at the sub-pixel landing point. Circle centres show up as
//! accumulator peaks because gradients along a circular boundary all point
//! through its centre. Sobel directions are only a few degrees accurate, so
//! a centre is scored by the votes in its 3×3 neighbourhood rather than by a
//! single cell. Peaks above the vote threshold are visited in decreasing
//! order; each one far enough from the centres already accepted gets the
//! radius with the strongest edge support, and is kept when that support
//! covers enough of the circumference.
use super::{Circle, HoughParams};
use crate::edges::{canny, sobel_gradients, CannyParams, MagnitudeNorm};
use crate::error::Result;
use crate::image::{GrayImage, ImageView};
use log::debug;

/// Edge pixel with its unit gradient direction.
#[derive(Clone, Copy, Debug)]
struct EdgePoint {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

fn collect_edges(gray: &GrayImage, canny_high: f32) -> Result<Vec<EdgePoint>> {
    let edges = canny(gray, &CannyParams::new(canny_high * 0.5, canny_high))?;
    let grad = sobel_gradients(gray, MagnitudeNorm::L1);
    let mut points = Vec::new();
    for y in 0..edges.height() {
        for (x, &e) in edges.row(y).iter().enumerate() {
            if e == 0 {
                continue;
            }
            let gx = grad.gx.get(x, y);
            let gy = grad.gy.get(x, y);
            let mag = (gx * gx + gy * gy).sqrt();
            if mag <= f32::EPSILON {
                continue;
            }
            points.push(EdgePoint {
                x: x as f32,
                y: y as f32,
                dx: gx / mag,
                dy: gy / mag,
            });
        }
    }
    Ok(points)
}

/// Deposit one vote at a sub-pixel position, split bilinearly over the four
/// surrounding cells. The position must lie in `[0, w - 1) × [0, h - 1)`.
#[inline]
fn bilinear_add(acc: &mut [f32], stride: usize, x: f32, y: f32) {
    let x0 = x as usize;
    let y0 = y as usize;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let base = y0 * stride + x0;
    acc[base] += (1.0 - fx) * (1.0 - fy);
    acc[base + 1] += fx * (1.0 - fy);
    acc[base + stride] += (1.0 - fx) * fy;
    acc[base + stride + 1] += fx * fy;
}

fn accumulate(points: &[EdgePoint], w: usize, h: usize, min_r: u32, max_r: u32) -> Vec<f32> {
    let mut acc = vec![0.0f32; w * h];
    if w < 2 || h < 2 {
        return acc;
    }
    let x_limit = (w - 1) as f32;
    let y_limit = (h - 1) as f32;
    for p in points {
        for r in min_r..=max_r {
            let r = r as f32;
            for sign in [1.0f32, -1.0] {
                let vx = p.x + sign * r * p.dx;
                let vy = p.y + sign * r * p.dy;
                if vx >= 0.0 && vy >= 0.0 && vx < x_limit && vy < y_limit {
                    bilinear_add(&mut acc, w, vx, vy);
                }
            }
        }
    }
    acc
}

/// Votes gathered in each cell's 3×3 neighbourhood. Border cells stay zero.
fn neighbourhood_votes(acc: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; w * h];
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let mut sum = 0.0;
            for row in y - 1..=y + 1 {
                let i = row * w + x;
                sum += acc[i - 1] + acc[i] + acc[i + 1];
            }
            out[y * w + x] = sum;
        }
    }
    out
}

/// Centre candidate: vote-weighted centroid of a peak's 3×3 neighbourhood.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    x: f32,
    y: f32,
    votes: f32,
}

/// Neighbourhood sums above `threshold` that dominate their 4-neighbours,
/// strongest first.
fn peaks(acc: &[f32], score: &[f32], w: usize, h: usize, threshold: f32) -> Vec<Candidate> {
    let mut out = Vec::new();
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = y * w + x;
            let v = score[i];
            if v > threshold
                && v > 0.0
                && v > score[i - 1]
                && v >= score[i + 1]
                && v > score[i - w]
                && v >= score[i + w]
            {
                let (mut sx, mut sy) = (0.0f32, 0.0f32);
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        let a = acc[ny * w + nx];
                        sx += a * nx as f32;
                        sy += a * ny as f32;
                    }
                }
                out.push(Candidate {
                    x: sx / v,
                    y: sy / v,
                    votes: v,
                });
            }
        }
    }
    // stable: equal votes keep raster order
    out.sort_by(|a, b| b.votes.total_cmp(&a.votes));
    out
}

/// Radius with the most edge pixels at (rounded) distance `r ± 1` from the
/// centre. Returns `(radius, support)`; ties prefer the smaller radius.
fn best_radius(points: &[EdgePoint], cx: f32, cy: f32, min_r: u32, max_r: u32) -> Option<(u32, u32)> {
    let mut hist = vec![0u32; max_r as usize + 2];
    for p in points {
        let d = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt().round() as u32;
        if d + 1 >= min_r && d <= max_r + 1 {
            hist[d as usize] += 1;
        }
    }
    let mut best: Option<(u32, u32)> = None;
    for r in min_r.max(1)..=max_r {
        let r_us = r as usize;
        let support = hist[r_us - 1] + hist[r_us] + hist[r_us + 1];
        if best.map_or(true, |(_, s)| support > s) {
            best = Some((r, support));
        }
    }
    best
}

/// Whether `support` edge pixels cover enough of a circle of radius `r`.
fn covers_circle(support: u32, r: u32, min_coverage: f32) -> bool {
    support > 0 && support as f32 >= min_coverage * std::f32::consts::TAU * r as f32
}

/// Detect circles on a (pre-smoothed) grayscale image.
pub fn detect_circles(gray: &GrayImage, params: &HoughParams) -> Result<Vec<Circle>> {
    params.validate()?;
    let (w, h) = (gray.width(), gray.height());
    let min_r = params.min_radius.max(1);
    let max_r = params.max_radius;
    let min_dist = params.min_center_distance(h);

    let points = collect_edges(gray, params.canny_high)?;
    if points.is_empty() {
        return Ok(Vec::new());
    }
    let acc = accumulate(&points, w, h, min_r, max_r);
    let score = neighbourhood_votes(&acc, w, h);
    let candidates = peaks(&acc, &score, w, h, params.accumulator_threshold as f32);
    debug!(
        "hough: {} edge points, {} centre candidates, min_dist={:.2}",
        points.len(),
        candidates.len(),
        min_dist
    );

    let mut circles: Vec<Circle> = Vec::new();
    let min_dist2 = min_dist * min_dist;
    for Candidate { x: cx, y: cy, votes } in candidates {
        let crowded = circles.iter().any(|c| {
            let ddx = c.x - cx;
            let ddy = c.y - cy;
            ddx * ddx + ddy * ddy < min_dist2
        });
        if crowded {
            continue;
        }
        let Some((radius, support)) = best_radius(&points, cx, cy, min_r, max_r) else {
            continue;
        };
        if !covers_circle(support, radius, params.min_edge_coverage) {
            debug!(
                "hough: centre ({:.1}, {:.1}) rejected, {} edge pixels at r={}",
                cx, cy, support, radius
            );
            continue;
        }
        circles.push(Circle {
            x: cx,
            y: cy,
            radius: radius as f32,
            votes: votes.round() as u32,
        });
    }
    Ok(circles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(size: usize, cx: f32, cy: f32, r: f32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d <= r {
                230
            } else {
                20
            }
        })
    }

    #[test]
    fn finds_single_disc() {
        let gray = disc(128, 64.0, 60.0, 20.0);
        let circles = detect_circles(&gray, &HoughParams::default()).unwrap();
        assert!(!circles.is_empty());
        let c = circles[0];
        assert!((c.x - 64.0).abs() <= 2.0 && (c.y - 60.0).abs() <= 2.0, "{c:?}");
        assert!((c.radius - 20.0).abs() <= 2.0, "{c:?}");
        assert!(c.votes > 30);
    }

    #[test]
    fn separated_discs_are_both_found() {
        let a = disc(160, 45.0, 50.0, 15.0);
        let b = disc(160, 115.0, 105.0, 22.0);
        let gray = GrayImage::from_fn(160, 160, |x, y| a.get(x, y).max(b.get(x, y)));
        let circles = detect_circles(&gray, &HoughParams::default()).unwrap();
        let near = |x: f32, y: f32| {
            circles
                .iter()
                .any(|c| (c.x - x).abs() <= 2.0 && (c.y - y).abs() <= 2.0)
        };
        assert!(near(45.0, 50.0));
        assert!(near(115.0, 105.0));
    }

    #[test]
    fn accepted_centres_respect_min_distance() {
        let gray = disc(128, 64.0, 64.0, 18.0);
        let circles = detect_circles(&gray, &HoughParams::default()).unwrap();
        assert!(!circles.is_empty());
        let min_dist = HoughParams::default().min_center_distance(128);
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(d >= min_dist);
            }
        }
    }

    #[test]
    fn clean_disc_yields_exactly_one_circle() {
        let gray = disc(128, 64.0, 60.0, 20.0);
        let circles = detect_circles(&gray, &HoughParams::default()).unwrap();
        assert_eq!(circles.len(), 1, "{circles:?}");
    }

    #[test]
    fn small_circle_is_accepted_by_coverage() {
        // r = 4 has far fewer than 30 boundary pixels
        let gray = disc(48, 24.0, 24.0, 4.0);
        let circles = detect_circles(&gray, &HoughParams::default()).unwrap();
        assert!(!circles.is_empty());
        let c = circles[0];
        assert!((c.x - 24.0).abs() <= 1.5 && (c.y - 24.0).abs() <= 1.5, "{c:?}");
        assert!((c.radius - 4.0).abs() <= 1.5, "{c:?}");
    }

    #[test]
    fn coverage_scales_with_radius() {
        assert!(covers_circle(13, 4, 0.5));
        assert!(!covers_circle(12, 4, 0.5));
        assert!(!covers_circle(40, 28, 0.5));
        assert!(!covers_circle(0, 1, 0.0));
    }

    #[test]
    fn flat_image_has_no_circles() {
        let gray = GrayImage::from_fn(64, 64, |_, _| 128);
        assert!(detect_circles(&gray, &HoughParams::default()).unwrap().is_empty());
    }

    #[test]
    fn votes_converge_on_centre() {
        let points: Vec<EdgePoint> = (0..36)
            .map(|i| {
                let t = (i as f32 * 10.0).to_radians();
                EdgePoint {
                    x: 20.0 + 10.0 * t.cos(),
                    y: 20.0 + 10.0 * t.sin(),
                    dx: t.cos(),
                    dy: t.sin(),
                }
            })
            .collect();
        let acc = accumulate(&points, 41, 41, 1, 15);
        assert!(acc[20 * 41 + 20] >= 36.0 - 1e-3);
        let score = neighbourhood_votes(&acc, 41, 41);
        let peak = peaks(&acc, &score, 41, 41, 0.0);
        // radii 9, 10 and 11 land entirely inside the centre's neighbourhood
        assert!(peak[0].votes >= 108.0 - 1e-2 && peak[0].votes < 115.0, "{:?}", peak[0]);
        assert!((peak[0].x - 20.0).abs() < 0.05 && (peak[0].y - 20.0).abs() < 0.05);
    }

    #[test]
    fn bilinear_vote_splits_between_cells() {
        let mut acc = vec![0.0f32; 9];
        bilinear_add(&mut acc, 3, 0.25, 1.5);
        assert!((acc[3] - 0.375).abs() < 1e-6);
        assert!((acc[4] - 0.125).abs() < 1e-6);
        assert!((acc[6] - 0.375).abs() < 1e-6);
        assert!((acc[7] - 0.125).abs() < 1e-6);
        assert!((acc.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}

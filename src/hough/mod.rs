//! Circle detection by gradient Hough voting, and the circle kernel.
//!
//! The kernel median-filters the luma plane, detects circles and paints a
//! centre marker plus an outline for each one directly into the input
//! raster, which is then returned.

mod gradient;

pub use gradient::detect_circles;

use crate::color::to_gray;
use crate::draw::{draw_circle, Point, Stroke};
use crate::error::{CatalogError, Result};
use crate::filters::{median_blur_gray, MedianParams};
use crate::image::{Bgr, ImageView, RasterImage};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Accumulator votes in the 3×3 neighbourhood of the centre.
    pub votes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Median window applied before voting.
    pub median_ksize: usize,
    /// Minimum centre distance; `None` means `rows / 16`.
    pub min_dist: Option<f32>,
    /// Upper Canny threshold; the lower one is half of it.
    pub canny_high: f32,
    /// Votes a centre's 3×3 neighbourhood needs to exceed.
    pub accumulator_threshold: u32,
    /// Fraction of the circumference `2πr` that edge pixels within one pixel
    /// of the radius must cover.
    pub min_edge_coverage: f32,
    pub min_radius: u32,
    pub max_radius: u32,
    pub center_color: Bgr,
    pub outline_color: Bgr,
    pub thickness: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            median_ksize: 5,
            min_dist: None,
            canny_high: 100.0,
            accumulator_threshold: 30,
            min_edge_coverage: 0.5,
            min_radius: 1,
            max_radius: 30,
            center_color: Bgr::new(0, 100, 100),
            outline_color: Bgr::MAGENTA,
            thickness: 3,
        }
    }
}

impl HoughParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_radius == 0 || self.max_radius < self.min_radius {
            return Err(CatalogError::invalid(format!(
                "circle radius range [{}, {}] is empty",
                self.min_radius, self.max_radius
            )));
        }
        if !(self.canny_high > 0.0) {
            return Err(CatalogError::invalid(format!(
                "canny_high must be positive, got {}",
                self.canny_high
            )));
        }
        if !(0.0..=1.0).contains(&self.min_edge_coverage) {
            return Err(CatalogError::invalid(format!(
                "min_edge_coverage must lie in [0, 1], got {}",
                self.min_edge_coverage
            )));
        }
        if let Some(d) = self.min_dist {
            if !(d > 0.0) {
                return Err(CatalogError::invalid(format!(
                    "min_dist must be positive, got {d}"
                )));
            }
        }
        Ok(())
    }

    pub fn min_center_distance(&self, rows: usize) -> f32 {
        self.min_dist.unwrap_or(rows as f32 / 16.0)
    }
}

/// Paint centre markers and outlines for `circles` into `canvas`.
pub fn draw_circles(canvas: &mut RasterImage, circles: &[Circle], params: &HoughParams) {
    let stroke = Stroke::Width(params.thickness.max(1));
    for c in circles {
        let center = Point::new(c.x.round() as i32, c.y.round() as i32);
        draw_circle(canvas, center, 1.0, params.center_color, stroke);
        draw_circle(canvas, center, c.radius, params.outline_color, stroke);
    }
}

/// Circle kernel. Consumes the input and draws on it in place.
pub fn circle_drawing(mut src: RasterImage, params: &HoughParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let smoothed = median_blur_gray(&to_gray(&src), &MedianParams::with_ksize(params.median_ksize))?;
    let circles = detect_circles(&smoothed, params)?;
    debug!(
        "circles {}x{}: {} detected",
        src.width(),
        src.height(),
        circles.len()
    );
    draw_circles(&mut src, &circles, params);
    Ok(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_marker_and_outline_over_input() {
        let bg = Bgr::new(40, 60, 20);
        let src = RasterImage::from_fn(128, 128, |x, y| {
            let d = ((x as f32 - 64.0).powi(2) + (y as f32 - 64.0).powi(2)).sqrt();
            if d <= 20.0 {
                Bgr::WHITE
            } else {
                bg
            }
        });
        let out = circle_drawing(src, &HoughParams::default()).unwrap();
        assert_eq!(out.width(), 128);
        let centre_marked = (62..=66)
            .flat_map(|y| (62..=66).map(move |x| (x, y)))
            .any(|(x, y)| out.pixel(x, y) == Bgr::new(0, 100, 100));
        assert!(centre_marked);
        assert!(out.pixels().any(|p| p == Bgr::MAGENTA));
        // the untouched background survives
        assert_eq!(out.pixel(2, 2), bg);
    }

    #[test]
    fn blank_input_is_unchanged() {
        let src = RasterImage::filled(64, 48, Bgr::gray(90));
        let out = circle_drawing(src.clone(), &HoughParams::default()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn min_dist_defaults_to_rows_over_16() {
        assert_eq!(HoughParams::default().min_center_distance(480), 30.0);
        let params = HoughParams {
            min_dist: Some(5.0),
            ..Default::default()
        };
        assert_eq!(params.min_center_distance(480), 5.0);
    }

    #[test]
    fn rejects_coverage_outside_unit_range() {
        let params = HoughParams {
            min_edge_coverage: 1.5,
            ..Default::default()
        };
        let err = circle_drawing(RasterImage::new(8, 8), &params).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));
    }

    #[test]
    fn rejects_inverted_radius_range() {
        let params = HoughParams {
            min_radius: 40,
            max_radius: 30,
            ..Default::default()
        };
        let err = circle_drawing(RasterImage::new(8, 8), &params).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));
    }
}

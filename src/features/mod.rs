//! Keypoint features and the keypoint drawing kernel.
//!
//! - [`fast`]: FAST-9 corners with score-based suppression.
//! - [`pyramid`]: fractional-scale pyramid (bilinear).
//! - [`orb`]: oriented keypoints with 256-bit binary descriptors.
//!
//! The kernel renders keypoints over a copy of the colour input. Descriptors
//! are computed but only the keypoints are drawn.

pub mod fast;
pub mod orb;
pub mod pyramid;

pub use fast::{detect_fast, Corner};
pub use orb::{detect_orb, hamming_distance, Descriptor, Keypoint, OrbFeatures, OrbParams};
pub use pyramid::{resize_bilinear, PyramidOptions, ScalePyramid};

use crate::color::{hsv_to_bgr, to_gray};
use crate::draw::{draw_circle, draw_line, Point, Stroke};
use crate::error::Result;
use crate::image::{Bgr, ImageView, RasterImage};
use log::debug;

/// Golden-angle hue step, so neighbouring indices get distinct colours.
const HUE_STEP: f32 = 137.508;

/// Colour assigned to the `index`-th keypoint.
pub fn keypoint_color(index: usize) -> Bgr {
    hsv_to_bgr(index as f32 * HUE_STEP, 0.85, 1.0)
}

/// Circle of diameter `size` plus a radius tick along the orientation.
pub fn draw_keypoints(canvas: &mut RasterImage, keypoints: &[Keypoint]) {
    for (i, kp) in keypoints.iter().enumerate() {
        let color = keypoint_color(i);
        let center = Point::new(kp.x.round() as i32, kp.y.round() as i32);
        let radius = (kp.size * 0.5).max(1.0);
        draw_circle(canvas, center, radius, color, Stroke::Width(1));
        let (sin, cos) = kp.angle.to_radians().sin_cos();
        let tip = Point::new(
            (kp.x + radius * cos).round() as i32,
            (kp.y + radius * sin).round() as i32,
        );
        draw_line(canvas, center, tip, color, 1);
    }
}

/// Keypoint kernel: ORB keypoints drawn over a copy of the input.
pub fn orb_drawing(src: &RasterImage, params: &OrbParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let features = detect_orb(&to_gray(src), params)?;
    debug!(
        "orb {}x{}: {} keypoints",
        src.width(),
        src.height(),
        features.len()
    );
    let mut canvas = src.clone();
    draw_keypoints(&mut canvas, &features.keypoints);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_input_is_returned_unchanged() {
        let src = RasterImage::filled(96, 80, Bgr::new(10, 120, 200));
        let out = orb_drawing(&src, &OrbParams::default()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn keypoints_are_drawn_over_the_input() {
        let src = RasterImage::from_fn(128, 128, |x, y| {
            if (48..80).contains(&x) && (48..80).contains(&y) {
                Bgr::WHITE
            } else {
                Bgr::gray(30)
            }
        });
        let out = orb_drawing(&src, &OrbParams::default()).unwrap();
        assert_eq!(out.width(), 128);
        assert_eq!(out.height(), 128);
        assert_ne!(out, src);
        // far corner untouched: the input is kept, not replaced by a canvas
        assert_eq!(out.pixel(0, 0), Bgr::gray(30));
    }

    #[test]
    fn colours_differ_between_neighbours() {
        assert_ne!(keypoint_color(0), keypoint_color(1));
        assert_eq!(keypoint_color(5), keypoint_color(5));
    }
}

//! Fractional-scale image pyramid for multi-scale keypoint detection.
//!
//! Level `l` is the base image resampled (bilinear) by `1 / scale_factor^l`.
//! Construction stops early once a level becomes too small to hold a
//! descriptor patch.
use crate::image::{GrayImage, ImageView, ImageViewMut};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidOptions {
    /// Maximum number of levels (>= 1).
    pub levels: usize,
    /// Size ratio between consecutive levels (> 1).
    pub scale_factor: f32,
    /// Levels whose smaller side drops below this are not built.
    pub min_side: usize,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            levels: 8,
            scale_factor: 1.2,
            min_side: 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PyramidLevel {
    pub image: GrayImage,
    /// Factor mapping level coordinates back to the base image.
    pub scale: f32,
}

#[derive(Clone, Debug)]
pub struct ScalePyramid {
    pub levels: Vec<PyramidLevel>,
}

impl ScalePyramid {
    pub fn build(base: &GrayImage, options: &PyramidOptions) -> Self {
        let mut levels = vec![PyramidLevel {
            image: base.clone(),
            scale: 1.0,
        }];
        for lvl in 1..options.levels.max(1) {
            let scale = options.scale_factor.powi(lvl as i32);
            let nw = (base.width() as f32 / scale).round() as usize;
            let nh = (base.height() as f32 / scale).round() as usize;
            if nw.min(nh) < options.min_side.max(1) {
                debug!(
                    "pyramid: stopping at level {} ({}x{} below {})",
                    lvl, nw, nh, options.min_side
                );
                break;
            }
            levels.push(PyramidLevel {
                image: resize_bilinear(base, nw, nh),
                scale,
            });
        }
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Pixel-centre aligned bilinear resampling.
pub fn resize_bilinear(src: &GrayImage, nw: usize, nh: usize) -> GrayImage {
    let mut out = GrayImage::new(nw, nh);
    if src.width() == 0 || src.height() == 0 || nw == 0 || nh == 0 {
        return out;
    }
    let sx = src.width() as f32 / nw as f32;
    let sy = src.height() as f32 / nh as f32;
    let max_x = (src.width() - 1) as f32;
    let max_y = (src.height() - 1) as f32;
    for y in 0..nh {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src.height() - 1);
        let ty = fy - y0 as f32;
        let (r0, r1) = (src.row(y0), src.row(y1));
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src.width() - 1);
            let tx = fx - x0 as f32;
            let top = r0[x0] as f32 * (1.0 - tx) + r0[x1] as f32 * tx;
            let bottom = r1[x0] as f32 * (1.0 - tx) + r1[x1] as f32 * tx;
            *px = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_sizes_follow_scale_factor() {
        let base = GrayImage::from_fn(120, 60, |x, _| x as u8);
        let pyr = ScalePyramid::build(&base, &PyramidOptions::default());
        assert_eq!(pyr.len(), 8);
        assert_eq!(pyr.levels[1].image.width(), 100);
        assert_eq!(pyr.levels[1].image.height(), 50);
        assert!((pyr.levels[7].scale - 1.2f32.powi(7)).abs() < 1e-4);
    }

    #[test]
    fn min_side_truncates() {
        let base = GrayImage::new(40, 40);
        let options = PyramidOptions {
            min_side: 30,
            ..Default::default()
        };
        let pyr = ScalePyramid::build(&base, &options);
        // 40, 33, 28 -> stops before the third level
        assert_eq!(pyr.len(), 2);
    }

    #[test]
    fn resize_keeps_constant_image() {
        let src = GrayImage::from_fn(17, 9, |_, _| 77);
        let out = resize_bilinear(&src, 11, 5);
        assert!(out.data.iter().all(|&v| v == 77));
    }
}

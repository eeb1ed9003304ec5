//! Canny edge detector.
//!
//! Grayscale → Sobel (L1 magnitude by default) → non-maximum suppression →
//! double-threshold hysteresis. Ridge pixels above `high` seed edges; pixels
//! in `[low, high]` survive only when 8-connected to a seed through other
//! surviving pixels.
use super::grad::{sobel_gradients, MagnitudeNorm};
use super::nms::suppress_non_maxima;
use crate::color::to_gray;
use crate::error::{CatalogError, Result};
use crate::image::{GrayImage, ImageF32, RasterImage};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub norm: MagnitudeNorm,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 100.0,
            high_threshold: 200.0,
            norm: MagnitudeNorm::L1,
        }
    }
}

impl CannyParams {
    pub fn new(low_threshold: f32, high_threshold: f32) -> Self {
        Self {
            low_threshold,
            high_threshold,
            ..Default::default()
        }
    }

    fn ordered(&self) -> Result<(f32, f32)> {
        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(CatalogError::invalid("canny thresholds must be finite"));
        }
        let lo = self.low_threshold.min(self.high_threshold);
        let hi = self.low_threshold.max(self.high_threshold);
        Ok((lo, hi))
    }
}

/// Binary edge map: 255 on edges, 0 elsewhere.
pub fn canny(gray: &GrayImage, params: &CannyParams) -> Result<GrayImage> {
    let (low, high) = params.ordered()?;
    let grad = sobel_gradients(gray, params.norm);
    let ridges = suppress_non_maxima(&grad, 0.0);
    Ok(hysteresis(&ridges, low, high))
}

/// Canny kernel over a colour raster; edges are rendered white on black.
pub fn canny_edges(src: &RasterImage, params: &CannyParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    // edge pixels are 255, everything else 0
    Ok(canny(&to_gray(src), params)?.to_raster())
}

fn hysteresis(ridges: &ImageF32, low: f32, high: f32) -> GrayImage {
    let w = ridges.w;
    let h = ridges.h;
    let mut out = GrayImage::new(w, h);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if ridges.get(x, y) > high && out.get(x, y) == 0 {
                out.set(x, y, 255);
                stack.push((x, y));
                while let Some((cx, cy)) = stack.pop() {
                    for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                        for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                            if out.get(nx, ny) == 0 && ridges.get(nx, ny) >= low && ridges.get(nx, ny) > 0.0 {
                                out.set(nx, ny, 255);
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

//! Contour extraction and the contour drawing kernel.
//!
//! The kernel thresholds the luma plane, traces every border with its
//! nesting, and renders all of them (hierarchy flattened) onto a blank
//! canvas of the input size.

mod trace;
mod types;

pub use trace::find_contours;
pub use types::{ChainApprox, Contour, ContourSet, HierarchyNode};

use crate::color::{threshold_binary, to_gray};
use crate::draw::draw_polyline;
use crate::error::{CatalogError, Result};
use crate::image::{Bgr, ImageView, RasterImage};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Luma values `>= threshold` are foreground.
    pub threshold: u8,
    pub approx: ChainApprox,
    pub color: Bgr,
    pub thickness: u32,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            threshold: 128,
            approx: ChainApprox::Simple,
            color: Bgr::RED,
            thickness: 2,
        }
    }
}

/// Threshold, trace and return the contours of a colour raster.
pub fn extract_contours(src: &RasterImage, params: &ContourParams) -> Result<ContourSet> {
    src.ensure_non_empty()?;
    let mask = threshold_binary(&to_gray(src), params.threshold);
    Ok(find_contours(&mask, params.approx))
}

/// Draw every contour of `set` onto `canvas`.
pub fn draw_contours(canvas: &mut RasterImage, set: &ContourSet, color: Bgr, thickness: u32) {
    for contour in &set.contours {
        draw_polyline(canvas, &contour.points, true, color, thickness);
    }
}

/// Contour kernel: borders of the thresholded input on a black canvas.
pub fn contour_drawing(src: &RasterImage, params: &ContourParams) -> Result<RasterImage> {
    if params.thickness == 0 {
        return Err(CatalogError::invalid("contour thickness must be at least 1"));
    }
    let set = extract_contours(src, params)?;
    debug!(
        "contours {}x{}: {} borders ({} top level)",
        src.width(),
        src.height(),
        set.len(),
        set.roots().count()
    );
    let mut canvas = RasterImage::new(src.width(), src.height());
    draw_contours(&mut canvas, &set, params.color, params.thickness);
    Ok(canvas)
}

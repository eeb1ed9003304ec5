//! Stateful optical-flow kernel.
//!
//! The kernel compares each frame against the one stored in a
//! [`FrameCache`]. With no usable previous frame (empty cache or different
//! dimensions) it reports zero motion and primes the cache. The cache is
//! replaced only after the flow of the current frame has been computed.

pub mod lucas_kanade;

pub use lucas_kanade::{dense_flow, FlowField, FlowParams};

use crate::color::{hsv_to_bgr, to_gray};
use crate::error::Result;
use crate::image::{GrayImage, ImageView, RasterImage};
use log::debug;

/// Single-slot store for the previous grayscale frame.
#[derive(Debug, Default)]
pub struct FrameCache {
    previous: Option<GrayImage>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_none()
    }

    pub fn previous(&self) -> Option<&GrayImage> {
        self.previous.as_ref()
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    fn store(&mut self, frame: GrayImage) {
        self.previous = Some(frame);
    }
}

/// Colour-code a flow field: hue follows direction, brightness follows
/// magnitude relative to the field's maximum. Zero motion is black.
pub fn render_flow(field: &FlowField) -> RasterImage {
    let max = field.max_magnitude();
    if max <= f32::EPSILON {
        return RasterImage::new(field.width(), field.height());
    }
    RasterImage::from_fn(field.width(), field.height(), |x, y| {
        let (u, v) = (field.u.get(x, y), field.v.get(x, y));
        let hue = v.atan2(u).to_degrees();
        hsv_to_bgr(hue, 1.0, field.magnitude(x, y) / max)
    })
}

/// Flow kernel: motion between the cached frame and `src`.
pub fn optical_flow(cache: &mut FrameCache, src: &RasterImage, params: &FlowParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let current = to_gray(src);
    let field = match cache.previous() {
        Some(prev) if prev.same_dims(&current) => dense_flow(prev, &current, params)?,
        Some(prev) => {
            debug!(
                "optical flow: cached frame {}x{} does not match {}x{}, restarting",
                prev.width(),
                prev.height(),
                current.width(),
                current.height()
            );
            FlowField::zeros(current.width(), current.height())
        }
        None => {
            debug!("optical flow: priming frame cache");
            FlowField::zeros(current.width(), current.height())
        }
    };
    let out = render_flow(&field);
    cache.store(current);
    Ok(out)
}

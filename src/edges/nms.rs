//! Non-maximum suppression along the gradient direction.
//!
//! Each pixel is compared against its two neighbours along the gradient
//! direction quantised to 0°, 45°, 90° or 135°. The comparison is asymmetric
//! (`>` against the preceding neighbour, `>=` against the following one) so a
//! two-pixel-wide plateau on an ideal step edge keeps exactly one pixel.
//!
//! The outermost 1-pixel frame is never kept.
use crate::edges::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Thin `grad.mag` to ridges; suppressed or sub-`floor` pixels become 0.
pub fn suppress_non_maxima(grad: &Grad, floor: f32) -> ImageF32 {
    let w = grad.width();
    let h = grad.height();
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let dst = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= floor {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // (preceding, following) neighbour along the gradient.
            let (before, after) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > before && mag >= after {
                dst[x] = mag;
            }
        }
    }

    out
}

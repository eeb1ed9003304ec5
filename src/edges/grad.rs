//! 3×3 Sobel gradients on 8-bit grayscale input.
//!
//! - Convolves the kernel pair with border clamping (replicate).
//! - Outputs per-pixel `gx`, `gy` and a magnitude whose norm is selectable:
//!   L1 (`|gx| + |gy|`, the classic Canny scale) or L2.
//!
//! Complexity: O(W·H); memory: three float planes.
use crate::image::{GrayImage, ImageF32, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

pub(crate) type Kernel3 = [[f32; 3]; 3];

pub(crate) const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
pub(crate) const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeNorm {
    #[default]
    L1,
    L2,
}

impl MagnitudeNorm {
    #[inline]
    pub fn apply(self, gx: f32, gy: f32) -> f32 {
        match self {
            MagnitudeNorm::L1 => gx.abs() + gy.abs(),
            MagnitudeNorm::L2 => (gx * gx + gy * gy).sqrt(),
        }
    }
}

/// Per-pixel gradient planes.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    pub mag: ImageF32,
}

impl Grad {
    pub fn width(&self) -> usize {
        self.gx.w
    }

    pub fn height(&self) -> usize {
        self.gx.h
    }
}

/// Sobel derivatives of `gray` with the chosen magnitude norm.
pub fn sobel_gradients(gray: &GrayImage, norm: MagnitudeNorm) -> Grad {
    let w = gray.w;
    let h = gray.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [gray.row(y_idx[0]), gray.row(y_idx[1]), gray.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum_x = 0.0;
            for (ky, src_row) in rows.iter().enumerate() {
                let k = &SOBEL_KERNEL_X[ky];
                sum_x += src_row[x_idx[0]] as f32 * k[0]
                    + src_row[x_idx[1]] as f32 * k[1]
                    + src_row[x_idx[2]] as f32 * k[2];
            }
            out_gx[x] = sum_x;
        }
        let out_gy = gy.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum_y = 0.0;
            for (ky, src_row) in rows.iter().enumerate() {
                let k = &SOBEL_KERNEL_Y[ky];
                sum_y += src_row[x_idx[0]] as f32 * k[0]
                    + src_row[x_idx[1]] as f32 * k[1]
                    + src_row[x_idx[2]] as f32 * k[2];
            }
            out_gy[x] = sum_y;
        }
    }
    for ((m, &dx), &dy) in mag.data.iter_mut().zip(&gx.data).zip(&gy.data) {
        *m = norm.apply(dx, dy);
    }

    Grad { gx, gy, mag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_step_has_horizontal_gradient() {
        let gray = GrayImage::from_fn(8, 5, |x, _| if x < 4 { 0 } else { 100 });
        let grad = sobel_gradients(&gray, MagnitudeNorm::L1);
        assert_eq!(grad.gx.get(3, 2), 400.0);
        assert_eq!(grad.gy.get(3, 2), 0.0);
        assert_eq!(grad.mag.get(3, 2), 400.0);
        assert_eq!(grad.mag.get(0, 2), 0.0);
    }

    #[test]
    fn l2_norm_on_diagonal() {
        let norm = MagnitudeNorm::L2;
        assert_eq!(norm.apply(3.0, -4.0), 5.0);
        assert_eq!(MagnitudeNorm::L1.apply(3.0, -4.0), 7.0);
    }
}

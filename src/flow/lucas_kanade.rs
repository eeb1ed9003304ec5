//! Dense Lucas–Kanade optical flow.
//!
//! For every pixel the brightness-constancy equations of a square window are
//! solved in the least-squares sense:
//!
//! ```text
//! [Σ IxIx  Σ IxIy] [u]     [Σ IxIt]
//! [Σ IxIy  Σ IyIy] [v] = - [Σ IyIt]
//! ```
//!
//! Window sums come from integral images, so the cost is independent of the
//! window size. Pixels whose structure tensor is near singular (flat or
//! edge-only texture) get zero flow.
use crate::edges::{sobel_gradients, MagnitudeNorm};
use crate::error::{CatalogError, Result};
use crate::image::{GrayImage, ImageF32, ImageView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Side of the square integration window (odd).
    pub window: usize,
    /// Minimum smallest eigenvalue of the window-averaged structure tensor.
    pub min_eigen: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            window: 15,
            min_eigen: 1e-2,
        }
    }
}

/// Per-pixel displacement from the previous to the current frame.
#[derive(Clone, Debug)]
pub struct FlowField {
    pub u: ImageF32,
    pub v: ImageF32,
}

impl FlowField {
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            u: ImageF32::new(w, h),
            v: ImageF32::new(w, h),
        }
    }

    pub fn width(&self) -> usize {
        self.u.w
    }

    pub fn height(&self) -> usize {
        self.u.h
    }

    #[inline]
    pub fn magnitude(&self, x: usize, y: usize) -> f32 {
        self.u.get(x, y).hypot(self.v.get(x, y))
    }

    pub fn max_magnitude(&self) -> f32 {
        let mut m = 0.0f32;
        for y in 0..self.height() {
            for x in 0..self.width() {
                m = m.max(self.magnitude(x, y));
            }
        }
        m
    }
}

/// Summed-area table with one row and column of zero padding.
struct Integral {
    w: usize,
    data: Vec<f64>,
}

impl Integral {
    fn new(w: usize, h: usize, f: impl Fn(usize) -> f64) -> Self {
        let iw = w + 1;
        let mut data = vec![0.0f64; iw * (h + 1)];
        for y in 0..h {
            let mut row_sum = 0.0;
            for x in 0..w {
                row_sum += f(y * w + x);
                data[(y + 1) * iw + x + 1] = data[y * iw + x + 1] + row_sum;
            }
        }
        Self { w: iw, data }
    }

    /// Sum over `[x0, x1) × [y0, y1)`.
    #[inline]
    fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let w = self.w;
        self.data[y1 * w + x1] - self.data[y0 * w + x1] - self.data[y1 * w + x0] + self.data[y0 * w + x0]
    }
}

/// Flow from `prev` to `next`. Both frames must share dimensions.
pub fn dense_flow(prev: &GrayImage, next: &GrayImage, params: &FlowParams) -> Result<FlowField> {
    if params.window == 0 || params.window % 2 == 0 {
        return Err(CatalogError::invalid(format!(
            "flow window must be odd, got {}",
            params.window
        )));
    }
    if !prev.same_dims(next) {
        return Err(CatalogError::invalid(format!(
            "flow frames differ in size: {}x{} vs {}x{}",
            prev.width(),
            prev.height(),
            next.width(),
            next.height()
        )));
    }
    let (w, h) = (prev.width(), prev.height());
    let grad = sobel_gradients(prev, MagnitudeNorm::L1);
    // Sobel taps sum to 8 in magnitude; rescale to a unit-step derivative
    let ix: Vec<f64> = grad.gx.data.iter().map(|&g| g as f64 / 8.0).collect();
    let iy: Vec<f64> = grad.gy.data.iter().map(|&g| g as f64 / 8.0).collect();
    let it: Vec<f64> = next
        .data
        .iter()
        .zip(&prev.data)
        .map(|(&a, &b)| a as f64 - b as f64)
        .collect();

    let sxx = Integral::new(w, h, |i| ix[i] * ix[i]);
    let syy = Integral::new(w, h, |i| iy[i] * iy[i]);
    let sxy = Integral::new(w, h, |i| ix[i] * iy[i]);
    let sxt = Integral::new(w, h, |i| ix[i] * it[i]);
    let syt = Integral::new(w, h, |i| iy[i] * it[i]);

    let r = params.window / 2;
    let mut field = FlowField::zeros(w, h);
    for y in 0..h {
        let (y0, y1) = (y.saturating_sub(r), (y + r + 1).min(h));
        for x in 0..w {
            let (x0, x1) = (x.saturating_sub(r), (x + r + 1).min(w));
            let area = ((x1 - x0) * (y1 - y0)) as f64;
            let a = sxx.sum(x0, y0, x1, y1);
            let b = sxy.sum(x0, y0, x1, y1);
            let c = syy.sum(x0, y0, x1, y1);
            let half_trace = 0.5 * (a + c);
            let disc = (0.25 * (a - c) * (a - c) + b * b).sqrt();
            let min_eig = (half_trace - disc) / area;
            if min_eig < params.min_eigen as f64 {
                continue;
            }
            let det = a * c - b * b;
            let bx = -sxt.sum(x0, y0, x1, y1);
            let by = -syt.sum(x0, y0, x1, y1);
            field.u.set(x, y, ((c * bx - b * by) / det) as f32);
            field.v.set(x, y, ((a * by - b * bx) / det) as f32);
        }
    }
    Ok(field)
}

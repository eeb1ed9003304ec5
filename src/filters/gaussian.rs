//! Separable Gaussian blur.
//!
//! The 1D kernel is synthesised from the window size; when no sigma is given
//! it follows `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`. The horizontal
//! pass writes f32 rows, the vertical pass rounds back to u8, so a uniform
//! input is a fixed point.
use super::border::BorderMode;
use super::for_each_row_mut;
use crate::error::{CatalogError, Result};
use crate::image::{GrayImage, ImageView, RasterImage};
use log::debug;
use serde::{Deserialize, Serialize};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// The 1D taps in left-to-right order; the centre tap sits at `len / 2`.
    fn taps(&self) -> &[f32];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// Normalised Gaussian taps for a given window size.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
    sigma: f32,
}

impl GaussianKernel {
    pub fn new(ksize: usize, sigma: f32) -> Result<Self> {
        if ksize == 0 || ksize % 2 == 0 {
            return Err(CatalogError::invalid(format!(
                "gaussian window must be odd and positive, got {ksize}"
            )));
        }
        let sigma = if sigma > 0.0 { sigma } else { sigma_for_size(ksize) };
        Ok(Self {
            taps: gaussian_taps(ksize, sigma),
            sigma,
        })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianParams {
    /// Window side length (odd).
    pub ksize: usize,
    /// Standard deviation; `<= 0` derives it from `ksize`.
    pub sigma: f32,
    pub border: BorderMode,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            ksize: 15,
            sigma: 0.0,
            border: BorderMode::Reflect101,
        }
    }
}

/// Standard deviation implied by a window size.
pub fn sigma_for_size(ksize: usize) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// `ksize` Gaussian taps for `sigma`, normalised to sum to one.
pub fn gaussian_taps(ksize: usize, sigma: f32) -> Vec<f32> {
    let radius = (ksize / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..ksize)
        .map(|i| {
            let d = i as f32 - radius;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Blur a colour raster with a separable Gaussian.
pub fn gaussian_blur(src: &RasterImage, params: &GaussianParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let kernel = GaussianKernel::new(params.ksize, params.sigma)?;
    debug!(
        "gaussian blur {}x{}: ksize={} sigma={:.3}",
        src.width(),
        src.height(),
        params.ksize,
        kernel.sigma()
    );
    let data = convolve_separable(
        src.as_bytes(),
        src.width(),
        src.height(),
        src.channels(),
        &kernel,
        params.border,
    );
    RasterImage::from_raw(src.width(), src.height(), data)
}

/// Blur a grayscale image with a separable Gaussian.
pub fn gaussian_blur_gray(src: &GrayImage, params: &GaussianParams) -> Result<GrayImage> {
    if src.is_empty() {
        return Err(CatalogError::invalid("gaussian blur on zero-area image"));
    }
    let kernel = GaussianKernel::new(params.ksize, params.sigma)?;
    let data = convolve_separable(&src.data, src.w, src.h, 1, &kernel, params.border);
    Ok(GrayImage {
        w: src.w,
        h: src.h,
        data,
    })
}

/// Horizontal then vertical pass over an interleaved buffer.
pub fn convolve_separable(
    data: &[u8],
    w: usize,
    h: usize,
    channels: usize,
    filter: &impl SeparableFilter,
    border: BorderMode,
) -> Vec<u8> {
    let taps = filter.taps();
    let radius = filter.radius() as isize;
    let row_len = w * channels;

    let mut horiz = vec![0.0f32; row_len * h];
    for_each_row_mut(&mut horiz, row_len, |y, out| {
        let src_row = &data[y * row_len..(y + 1) * row_len];
        for x in 0..w {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, &tap) in taps.iter().enumerate() {
                    let sx = border.fold(x as isize + k as isize - radius, w);
                    acc += tap * src_row[sx * channels + c] as f32;
                }
                out[x * channels + c] = acc;
            }
        }
    });

    let mut out = vec![0u8; row_len * h];
    for_each_row_mut(&mut out, row_len, |y, dst| {
        for (i, px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = border.fold(y as isize + k as isize - radius, h);
                acc += tap * horiz[sy * row_len + i];
            }
            *px = acc.round().clamp(0.0, 255.0) as u8;
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Bgr;
    use approx::assert_abs_diff_eq;

    #[test]
    fn derived_sigma_for_fifteen_tap_window() {
        assert_abs_diff_eq!(sigma_for_size(15), 2.6, epsilon = 1e-6);
        assert_abs_diff_eq!(sigma_for_size(3), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn kernel_derives_sigma_only_when_unset() {
        assert_abs_diff_eq!(GaussianKernel::new(15, 0.0).unwrap().sigma(), 2.6, epsilon = 1e-6);
        assert_abs_diff_eq!(GaussianKernel::new(15, 1.5).unwrap().sigma(), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn taps_are_normalised_and_symmetric() {
        let taps = gaussian_taps(15, 2.6);
        assert_eq!(taps.len(), 15);
        assert_abs_diff_eq!(taps.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        for i in 0..7 {
            assert_abs_diff_eq!(taps[i], taps[14 - i], epsilon = 1e-7);
        }
        assert!(taps[7] > taps[6]);
    }

    #[test]
    fn even_window_is_rejected() {
        let img = RasterImage::new(8, 8);
        let params = GaussianParams {
            ksize: 4,
            ..Default::default()
        };
        assert!(matches!(
            gaussian_blur(&img, &params),
            Err(CatalogError::InvalidParameters(_))
        ));
    }

    #[test]
    fn uniform_image_is_fixed_point() {
        let img = RasterImage::filled(20, 13, Bgr::new(10, 128, 250));
        let out = gaussian_blur(&img, &GaussianParams::default()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn single_bright_pixel_spreads_symmetrically() {
        let mut gray = GrayImage::new(21, 21);
        gray.set(10, 10, 255);
        let out = gaussian_blur_gray(&gray, &GaussianParams::default()).unwrap();
        assert!(out.get(10, 10) < 255);
        assert_eq!(out.get(9, 10), out.get(11, 10));
        assert_eq!(out.get(10, 9), out.get(10, 11));
        assert!(out.get(10, 10) >= out.get(12, 10));
    }
}

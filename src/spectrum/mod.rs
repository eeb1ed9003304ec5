//! Log power spectrum of the luma plane.
//!
//! Steps: zero-pad to a 2·3·5-smooth size, 2-D DFT, `ln(1 + |F|)`, crop to
//! even dimensions, swap quadrants so the DC term sits in the centre,
//! min-max normalise to `[0, 1]`. The kernel renders the result as gray and
//! fits it back onto the input size (crop, or pad with black).

pub mod fft;

pub use fft::{fft, fft_2d, optimal_dft_size, C64};

use crate::color::to_gray;
use crate::error::{CatalogError, Result};
use crate::image::{Bgr, GrayImage, ImageF32, ImageView, RasterImage};
use log::{debug, warn};

/// Centred, normalised log-magnitude spectrum.
///
/// The output has the even-cropped padded size, so it can be a few pixels
/// larger or one pixel smaller than the input along each axis.
pub fn log_spectrum(gray: &GrayImage) -> Result<ImageF32> {
    if gray.is_empty() {
        return Err(CatalogError::invalid("spectrum of zero-area image"));
    }
    let pw = optimal_dft_size(gray.width());
    let ph = optimal_dft_size(gray.height());
    let mut plane = vec![C64::new(0.0, 0.0); pw * ph];
    for y in 0..gray.height() {
        for (x, &v) in gray.row(y).iter().enumerate() {
            plane[y * pw + x] = C64::new(v as f64, 0.0);
        }
    }
    fft_2d(&mut plane, pw, ph);

    let (ew, eh) = (pw & !1, ph & !1);
    if ew == 0 || eh == 0 {
        warn!(
            "spectrum: padded size {}x{} has no even crop, returning empty plane",
            pw, ph
        );
        return Ok(ImageF32::new(ew, eh));
    }
    let (hx, hy) = (ew / 2, eh / 2);
    let mut out = ImageF32::from_fn(ew, eh, |x, y| {
        // quadrant swap: output (x, y) shows frequency (x + hx, y + hy)
        let sx = (x + hx) % ew;
        let sy = (y + hy) % eh;
        (1.0 + plane[sy * pw + sx].norm()).ln() as f32
    });
    normalize_min_max(&mut out);
    Ok(out)
}

/// Stretch values to `[0, 1]`; a constant plane becomes all zeros.
fn normalize_min_max(img: &mut ImageF32) {
    let Some((lo, hi)) = img.min_max() else {
        return;
    };
    let span = hi - lo;
    if span <= f32::EPSILON {
        debug!("spectrum: flat magnitude plane, normalising to zero");
        img.data.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    for v in &mut img.data {
        *v = (*v - lo) / span;
    }
}

/// Spectrum kernel: gray rendering of [`log_spectrum`] sized like the input.
pub fn power_spectrum(src: &RasterImage) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let spectrum = log_spectrum(&to_gray(src))?;
    debug!(
        "spectrum {}x{} -> {}x{}",
        src.width(),
        src.height(),
        spectrum.w,
        spectrum.h
    );
    Ok(RasterImage::from_fn(src.width(), src.height(), |x, y| {
        if x < spectrum.w && y < spectrum.h {
            let v = (spectrum.get(x, y) * 255.0).round().clamp(0.0, 255.0) as u8;
            Bgr::gray(v)
        } else {
            Bgr::BLACK
        }
    }))
}

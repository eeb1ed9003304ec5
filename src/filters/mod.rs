//! Neighbourhood filters over interleaved 8-bit buffers.
//!
//! - [`gaussian`]: separable Gaussian blur with kernel synthesis from the
//!   window size.
//! - [`median`]: per-channel median over a square window using a sliding
//!   256-bin histogram.
//!
//! Both work on any channel count, so the same code serves the colour
//! kernels and the grayscale preprocessing of the circle detector. Rows are
//! independent, which is what the optional `parallel` feature exploits.

pub mod border;
pub mod gaussian;
pub mod median;

pub use border::BorderMode;
pub use gaussian::{gaussian_blur, gaussian_blur_gray, gaussian_taps, sigma_for_size, GaussianParams};
pub use median::{median_blur, median_blur_gray, MedianParams};

/// Run `f(y, row)` for every `row_len`-sized chunk of `buf`.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_row_mut<T, F>(buf: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    use rayon::prelude::*;
    if row_len == 0 {
        return;
    }
    buf.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Run `f(y, row)` for every `row_len`-sized chunk of `buf`.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_row_mut<T, F>(buf: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    buf.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

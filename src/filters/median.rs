//! Median blur with a sliding per-row histogram.
//!
//! Each output row seeds a 256-bin histogram per channel from the window
//! around column 0 and then slides it right by one column at a time, so the
//! cost per pixel is one window column plus a histogram scan. Borders
//! replicate edge samples.
use super::border::BorderMode;
use super::for_each_row_mut;
use crate::error::{CatalogError, Result};
use crate::image::{GrayImage, ImageView, RasterImage};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianParams {
    /// Window side length (odd).
    pub ksize: usize,
}

impl Default for MedianParams {
    fn default() -> Self {
        Self { ksize: 15 }
    }
}

impl MedianParams {
    pub fn with_ksize(ksize: usize) -> Self {
        Self { ksize }
    }

    fn radius(&self) -> Result<usize> {
        if self.ksize == 0 || self.ksize % 2 == 0 {
            return Err(CatalogError::invalid(format!(
                "median window must be odd and positive, got {}",
                self.ksize
            )));
        }
        Ok(self.ksize / 2)
    }
}

pub fn median_blur(src: &RasterImage, params: &MedianParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let radius = params.radius()?;
    let data = median_interleaved(src.as_bytes(), src.width(), src.height(), src.channels(), radius);
    RasterImage::from_raw(src.width(), src.height(), data)
}

pub fn median_blur_gray(src: &GrayImage, params: &MedianParams) -> Result<GrayImage> {
    if src.is_empty() {
        return Err(CatalogError::invalid("median blur on zero-area image"));
    }
    let radius = params.radius()?;
    Ok(GrayImage {
        w: src.w,
        h: src.h,
        data: median_interleaved(&src.data, src.w, src.h, 1, radius),
    })
}

struct Histogram {
    bins: [u32; 256],
}

impl Histogram {
    fn new() -> Self {
        Self { bins: [0; 256] }
    }

    /// Smallest level whose cumulative count exceeds `rank`.
    fn select(&self, rank: u32) -> u8 {
        let mut acc = 0u32;
        for (level, &count) in self.bins.iter().enumerate() {
            acc += count;
            if acc > rank {
                return level as u8;
            }
        }
        255
    }
}

fn median_interleaved(data: &[u8], w: usize, h: usize, channels: usize, radius: usize) -> Vec<u8> {
    let row_len = w * channels;
    let r = radius as isize;
    let window = (2 * radius + 1) as u32;
    let rank = window * window / 2;
    let border = BorderMode::Replicate;
    let sample = |x: isize, y: usize, c: usize| data[y * row_len + border.fold(x, w) * channels + c];

    let mut out = vec![0u8; row_len * h];
    for_each_row_mut(&mut out, row_len, |y, dst| {
        let rows: Vec<usize> = (-r..=r)
            .map(|dy| border.fold(y as isize + dy, h))
            .collect();
        for c in 0..channels {
            let mut hist = Histogram::new();
            for dx in -r..=r {
                for &sy in &rows {
                    hist.bins[sample(dx, sy, c) as usize] += 1;
                }
            }
            dst[c] = hist.select(rank);
            for x in 1..w as isize {
                for &sy in &rows {
                    hist.bins[sample(x - r - 1, sy, c) as usize] -= 1;
                    hist.bins[sample(x + r, sy, c) as usize] += 1;
                }
                dst[x as usize * channels + c] = hist.select(rank);
            }
        }
    });
    out
}

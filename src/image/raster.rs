//! Canonical 3-channel colour raster.
//!
//! Samples are interleaved in B, G, R order, rows are tightly packed and the
//! origin is the top-left corner. `data.len() == w * h * 3` always holds for
//! buffers built through the constructors below.
use crate::error::{CatalogError, Result};
use crate::image::traits::{ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

pub const RASTER_CHANNELS: usize = 3;

/// One colour sample in B, G, R order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bgr(pub [u8; 3]);

impl Bgr {
    pub const BLACK: Bgr = Bgr([0, 0, 0]);
    pub const WHITE: Bgr = Bgr([255, 255, 255]);
    pub const RED: Bgr = Bgr([0, 0, 255]);
    pub const MAGENTA: Bgr = Bgr([255, 0, 255]);

    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self([b, g, r])
    }

    pub const fn gray(v: u8) -> Self {
        Self([v, v, v])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Black raster of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, Bgr::BLACK)
    }

    pub fn filled(w: usize, h: usize, color: Bgr) -> Self {
        let mut data = Vec::with_capacity(w * h * RASTER_CHANNELS);
        for _ in 0..w * h {
            data.extend_from_slice(&color.0);
        }
        Self { w, h, data }
    }

    /// Wrap interleaved BGR samples, rejecting a length that does not match
    /// the dimensions.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Result<Self> {
        let expected = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(RASTER_CHANNELS))
            .ok_or_else(|| CatalogError::invalid(format!("raster {w}x{h} overflows")))?;
        if data.len() != expected {
            return Err(CatalogError::invalid(format!(
                "raster {w}x{h} needs {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self { w, h, data })
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Bgr) -> Self {
        let mut data = Vec::with_capacity(w * h * RASTER_CHANNELS);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&f(x, y).0);
            }
        }
        Self { w, h, data }
    }

    /// Fails with `InvalidParameters` for a zero-area raster.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(CatalogError::invalid(format!(
                "raster has zero area ({}x{})",
                self.w, self.h
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Bgr {
        let i = (y * self.w + x) * RASTER_CHANNELS;
        Bgr([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Bgr) {
        let i = (y * self.w + x) * RASTER_CHANNELS;
        self.data[i..i + RASTER_CHANNELS].copy_from_slice(&color.0);
    }

    /// Write `color` when `(x, y)` falls inside the raster, ignore otherwise.
    #[inline]
    pub fn put_clipped(&mut self, x: i64, y: i64, color: Bgr) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    pub fn width_u32(&self) -> u32 {
        self.w as u32
    }

    pub fn height_u32(&self) -> u32 {
        self.h as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixels(&self) -> impl Iterator<Item = Bgr> + '_ {
        self.data
            .chunks_exact(RASTER_CHANNELS)
            .map(|c| Bgr([c[0], c[1], c[2]]))
    }
}

impl ImageView for RasterImage {
    type Sample = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w * RASTER_CHANNELS
    }
    #[inline]
    fn channels(&self) -> usize {
        RASTER_CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let stride = self.stride();
        &self.data[y * stride..(y + 1) * stride]
    }
}

impl ImageViewMut for RasterImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride();
        &mut self.data[y * stride..(y + 1) * stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_length_mismatch() {
        let err = RasterImage::from_raw(4, 4, vec![0; 47]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));
        assert!(RasterImage::from_raw(4, 4, vec![0; 48]).is_ok());
    }

    #[test]
    fn pixel_access_is_bgr_interleaved() {
        let mut img = RasterImage::new(3, 2);
        img.set_pixel(2, 1, Bgr::new(1, 2, 3));
        assert_eq!(img.pixel(2, 1), Bgr::new(1, 2, 3));
        assert_eq!(&img.row(1)[6..9], &[1, 2, 3]);
        assert_eq!(img.as_bytes().len(), 3 * 2 * RASTER_CHANNELS);
    }

    #[test]
    fn zero_area_is_rejected() {
        let img = RasterImage::new(0, 5);
        assert!(img.ensure_non_empty().is_err());
    }
}

//! Colour-space helpers: luma conversion, thresholding, histogram
//! equalisation and an HSV palette used by visualisations.
use crate::image::{BinaryMask, Bgr, GrayImage, ImageView, ImageViewMut, RasterImage};

// BT.601 weights in 14-bit fixed point (0.114, 0.587, 0.299).
const LUMA_SHIFT: u32 = 14;
const LUMA_B: u32 = 1868;
const LUMA_G: u32 = 9617;
const LUMA_R: u32 = 4899;

#[inline]
pub fn luma(px: Bgr) -> u8 {
    let [b, g, r] = px.0;
    let y = b as u32 * LUMA_B + g as u32 * LUMA_G + r as u32 * LUMA_R + (1 << (LUMA_SHIFT - 1));
    (y >> LUMA_SHIFT) as u8
}

/// Convert a BGR raster to grayscale.
pub fn to_gray(src: &RasterImage) -> GrayImage {
    let mut out = GrayImage::new(src.width(), src.height());
    for y in 0..src.height() {
        let src_row = src.row(y);
        for (dst, px) in out.row_mut(y).iter_mut().zip(src_row.chunks_exact(3)) {
            *dst = luma(Bgr([px[0], px[1], px[2]]));
        }
    }
    out
}

/// Samples `>= thresh` become 255, everything else 0.
pub fn threshold_binary(gray: &GrayImage, thresh: u8) -> BinaryMask {
    GrayImage {
        w: gray.w,
        h: gray.h,
        data: gray
            .data
            .iter()
            .map(|&v| if v >= thresh { 255 } else { 0 })
            .collect(),
    }
}

/// Equalise each colour channel of a raster independently.
pub fn equalize_histogram(src: &RasterImage) -> RasterImage {
    let mut out = src.clone();
    for channel in 0..3 {
        let samples = out.as_bytes_mut().iter_mut().skip(channel).step_by(3);
        equalize_channel(samples);
    }
    out
}

fn equalize_channel<'a>(samples: impl Iterator<Item = &'a mut u8>) {
    let mut refs: Vec<&'a mut u8> = samples.collect();
    let mut hist = [0usize; 256];
    for v in refs.iter() {
        hist[**v as usize] += 1;
    }
    let lut = equalization_lut(&hist);
    for v in refs.iter_mut() {
        **v = lut[**v as usize];
    }
}

/// Lookup table mapping each level to its equalised value.
pub fn equalization_lut(hist: &[usize; 256]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = i as u8;
    }
    let total: usize = hist.iter().sum();
    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return lut;
    };
    let cdf_min = hist[first];
    if cdf_min == total {
        return lut;
    }
    let scale = 255.0 / (total - cdf_min) as f32;
    let mut cdf = 0usize;
    for (value, &count) in hist.iter().enumerate() {
        cdf += count;
        lut[value] = (cdf.saturating_sub(cdf_min) as f32 * scale).round() as u8;
    }
    lut
}

/// HSV to BGR with `hue` in degrees and `sat`, `val` in `[0, 1]`.
pub fn hsv_to_bgr(hue: f32, sat: f32, val: f32) -> Bgr {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = val * sat;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = val - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Bgr::new(to_u8(b), to_u8(g), to_u8(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_matches_reference_weights() {
        assert_eq!(luma(Bgr::WHITE), 255);
        assert_eq!(luma(Bgr::BLACK), 0);
        // 0.299 * 255 rounds to 76
        assert_eq!(luma(Bgr::new(0, 0, 255)), 76);
        assert_eq!(luma(Bgr::new(0, 255, 0)), 150);
        assert_eq!(luma(Bgr::new(255, 0, 0)), 29);
    }

    #[test]
    fn threshold_is_inclusive_at_128() {
        let gray = GrayImage {
            w: 3,
            h: 1,
            data: vec![127, 128, 200],
        };
        assert_eq!(threshold_binary(&gray, 128).data, vec![0, 255, 255]);
    }

    #[test]
    fn equalisation_stretches_narrow_range() {
        let src = RasterImage::from_fn(4, 1, |x, _| Bgr::gray(100 + x as u8));
        let out = equalize_histogram(&src);
        assert_eq!(out.pixel(0, 0), Bgr::gray(0));
        assert_eq!(out.pixel(3, 0), Bgr::gray(255));
    }

    #[test]
    fn equalisation_keeps_constant_image() {
        let src = RasterImage::filled(5, 5, Bgr::gray(42));
        assert_eq!(equalize_histogram(&src), src);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_bgr(0.0, 1.0, 1.0), Bgr::new(0, 0, 255));
        assert_eq!(hsv_to_bgr(120.0, 1.0, 1.0), Bgr::new(0, 255, 0));
        assert_eq!(hsv_to_bgr(240.0, 1.0, 1.0), Bgr::new(255, 0, 0));
        assert_eq!(hsv_to_bgr(45.0, 0.0, 0.0), Bgr::BLACK);
    }
}

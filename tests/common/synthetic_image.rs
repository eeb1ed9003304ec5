#![allow(dead_code)]

use vision_catalog::{Bgr, RasterImage};

/// High-contrast checkerboard in two gray levels.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> RasterImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    RasterImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) & 1 == 0 {
            Bgr::gray(32)
        } else {
            Bgr::gray(220)
        }
    })
}

/// Filled disc of `fg` over `bg`.
pub fn disc(width: usize, height: usize, cx: f32, cy: f32, r: f32, fg: Bgr, bg: Bgr) -> RasterImage {
    RasterImage::from_fn(width, height, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        if d <= r {
            fg
        } else {
            bg
        }
    })
}

/// White square ring (outer side `outer`, wall `wall`) centred on a black
/// background.
pub fn square_ring(size: usize, outer: usize, wall: usize) -> RasterImage {
    let lo = (size - outer) / 2;
    let hi = lo + outer;
    RasterImage::from_fn(size, size, |x, y| {
        let inside_outer = (lo..hi).contains(&x) && (lo..hi).contains(&y);
        let inside_inner = (lo + wall..hi - wall).contains(&x) && (lo + wall..hi - wall).contains(&y);
        if inside_outer && !inside_inner {
            Bgr::WHITE
        } else {
            Bgr::BLACK
        }
    })
}

/// Smooth colour ramp with a fixed pseudo-random speckle.
pub fn textured(width: usize, height: usize) -> RasterImage {
    RasterImage::from_fn(width, height, |x, y| {
        let speckle = ((x * 7919 + y * 104_729) % 31) as u8;
        Bgr::new(
            ((x * 200) / width.max(1)) as u8 + speckle,
            ((y * 200) / height.max(1)) as u8 + speckle,
            (((x + y) * 100) / (width + height).max(1)) as u8 + speckle,
        )
    })
}

//! Oriented FAST and rotated BRIEF.
//!
//! Per pyramid level: FAST-9 candidates away from the border, ranked by the
//! Harris response; orientation from the intensity centroid of a circular
//! patch; a 256-bit binary descriptor from intensity comparisons of a fixed
//! point-pair pattern, rotated by the keypoint angle and sampled on a
//! smoothed copy of the level.
use super::fast::detect_fast;
use super::pyramid::{PyramidOptions, ScalePyramid};
use crate::edges::grad::{SOBEL_KERNEL_X, SOBEL_KERNEL_Y};
use crate::error::{CatalogError, Result};
use crate::filters::{gaussian_blur_gray, BorderMode, GaussianParams};
use crate::image::{GrayImage, ImageView};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DESCRIPTOR_BYTES: usize = 32;
const DESCRIPTOR_BITS: usize = DESCRIPTOR_BYTES * 8;

pub type Descriptor = [u8; DESCRIPTOR_BYTES];

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbParams {
    /// FAST intensity margin.
    pub fast_threshold: u8,
    pub levels: usize,
    pub scale_factor: f32,
    /// Keypoints closer than this to a level edge are discarded.
    pub edge_threshold: usize,
    /// Side of the oriented patch at level scale.
    pub patch_size: usize,
    pub harris_k: f32,
    pub harris_block: usize,
    /// Keep only the strongest responses across all levels.
    pub max_features: Option<usize>,
    /// Seed of the BRIEF sampling pattern.
    pub pattern_seed: u64,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            levels: 8,
            scale_factor: 1.2,
            edge_threshold: 31,
            patch_size: 31,
            harris_k: 0.04,
            harris_block: 7,
            max_features: None,
            pattern_seed: 0x0b_12_1e_f0,
        }
    }
}

impl OrbParams {
    fn validate(&self) -> Result<()> {
        if self.levels == 0 || !(self.scale_factor > 1.0) {
            return Err(CatalogError::invalid(format!(
                "orb pyramid needs levels >= 1 and scale_factor > 1 (levels={}, scale_factor={})",
                self.levels, self.scale_factor
            )));
        }
        if self.patch_size < 7 || self.patch_size % 2 == 0 {
            return Err(CatalogError::invalid(format!(
                "orb patch_size must be odd and >= 7, got {}",
                self.patch_size
            )));
        }
        if self.harris_block < 3 || self.harris_block % 2 == 0 {
            return Err(CatalogError::invalid(format!(
                "orb harris_block must be odd and >= 3, got {}",
                self.harris_block
            )));
        }
        if self.edge_threshold < self.patch_size / 2 + 1 {
            return Err(CatalogError::invalid(format!(
                "orb edge_threshold {} cannot hold a patch of {}",
                self.edge_threshold, self.patch_size
            )));
        }
        Ok(())
    }
}

/// Keypoint in base-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Diameter of the meaningful neighbourhood.
    pub size: f32,
    /// Orientation in degrees, `[0, 360)`.
    pub angle: f32,
    pub response: f32,
    /// Pyramid level the keypoint was found on.
    pub octave: usize,
}

#[derive(Clone, Debug, Default)]
pub struct OrbFeatures {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

impl OrbFeatures {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Number of differing bits.
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Point pairs of the binary test, offsets relative to the keypoint.
struct BriefPattern {
    pairs: Vec<[(f32, f32); 2]>,
}

impl BriefPattern {
    fn new(patch_size: usize, seed: u64) -> Self {
        let half = (patch_size / 2).saturating_sub(2).max(1) as i32;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pick = || {
            (
                rng.gen_range(-half..=half) as f32,
                rng.gen_range(-half..=half) as f32,
            )
        };
        let pairs = (0..DESCRIPTOR_BITS).map(|_| [pick(), pick()]).collect();
        Self { pairs }
    }

    fn describe(&self, smooth: &GrayImage, x: usize, y: usize, angle_deg: f32) -> Descriptor {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let sample = |(px, py): (f32, f32)| {
            let rx = (cos * px - sin * py).round() as isize;
            let ry = (sin * px + cos * py).round() as isize;
            smooth.get_clamped(x as isize + rx, y as isize + ry)
        };
        let mut desc = [0u8; DESCRIPTOR_BYTES];
        for (bit, pair) in self.pairs.iter().enumerate() {
            if sample(pair[0]) < sample(pair[1]) {
                desc[bit / 8] |= 1 << (bit % 8);
            }
        }
        desc
    }
}

/// Harris corner measure over a `block`×`block` window of Sobel derivatives.
fn harris_response(img: &GrayImage, x: usize, y: usize, block: usize, k: f32) -> f32 {
    let r = (block / 2) as isize;
    let (mut a, mut b, mut c) = (0.0f32, 0.0f32, 0.0f32);
    for dy in -r..=r {
        for dx in -r..=r {
            let (cx, cy) = (x as isize + dx, y as isize + dy);
            let mut gx = 0.0;
            let mut gy = 0.0;
            for ky in 0..3 {
                for kx in 0..3 {
                    let v = img.get_clamped(cx + kx as isize - 1, cy + ky as isize - 1) as f32;
                    gx += SOBEL_KERNEL_X[ky][kx] * v;
                    gy += SOBEL_KERNEL_Y[ky][kx] * v;
                }
            }
            a += gx * gx;
            b += gy * gy;
            c += gx * gy;
        }
    }
    // normalise so the response does not depend on block size or bit depth
    let scale = 1.0 / (4.0 * block as f32 * 255.0);
    let s4 = scale.powi(4);
    (a * b - c * c - k * (a + b) * (a + b)) * s4
}

/// Orientation of the patch in degrees from its intensity centroid.
fn centroid_angle(img: &GrayImage, x: usize, y: usize, radius: isize) -> f32 {
    let (mut m01, mut m10) = (0.0f32, 0.0f32);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let v = img.get_clamped(x as isize + dx, y as isize + dy) as f32;
            m10 += dx as f32 * v;
            m01 += dy as f32 * v;
        }
    }
    let angle = m01.atan2(m10).to_degrees().rem_euclid(360.0);
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

/// Detect oriented keypoints and their descriptors on a grayscale image.
pub fn detect_orb(gray: &GrayImage, params: &OrbParams) -> Result<OrbFeatures> {
    params.validate()?;
    if gray.is_empty() {
        return Err(CatalogError::invalid("orb on zero-area image"));
    }
    let pyramid = ScalePyramid::build(
        gray,
        &PyramidOptions {
            levels: params.levels,
            scale_factor: params.scale_factor,
            min_side: 2 * params.edge_threshold + 1,
        },
    );
    let pattern = BriefPattern::new(params.patch_size, params.pattern_seed);
    let smoothing = GaussianParams {
        ksize: 7,
        sigma: 2.0,
        border: BorderMode::Reflect101,
    };
    let half_patch = (params.patch_size / 2) as isize;

    let mut found: Vec<(Keypoint, Descriptor)> = Vec::new();
    for (octave, level) in pyramid.levels.iter().enumerate() {
        let corners = detect_fast(&level.image, params.fast_threshold, params.edge_threshold, true);
        if corners.is_empty() {
            continue;
        }
        let smooth = gaussian_blur_gray(&level.image, &smoothing)?;
        debug!(
            "orb level {} ({}x{}): {} FAST corners",
            octave,
            level.image.width(),
            level.image.height(),
            corners.len()
        );
        for corner in corners {
            let response = harris_response(
                &level.image,
                corner.x,
                corner.y,
                params.harris_block,
                params.harris_k,
            );
            let angle = centroid_angle(&level.image, corner.x, corner.y, half_patch);
            let descriptor = pattern.describe(&smooth, corner.x, corner.y, angle);
            let keypoint = Keypoint {
                x: corner.x as f32 * level.scale,
                y: corner.y as f32 * level.scale,
                size: params.patch_size as f32 * level.scale,
                angle,
                response,
                octave,
            };
            found.push((keypoint, descriptor));
        }
    }

    if let Some(limit) = params.max_features {
        found.sort_by(|a, b| b.0.response.total_cmp(&a.0.response));
        found.truncate(limit);
    }

    let (keypoints, descriptors) = found.into_iter().unzip();
    Ok(OrbFeatures {
        keypoints,
        descriptors,
    })
}

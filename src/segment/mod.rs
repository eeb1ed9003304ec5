//! Colour segmentation by k-means clustering.
//!
//! Every pixel becomes one 3-component sample; after clustering each pixel is
//! replaced by its centroid colour (rounded and saturated to u8), which
//! posterises the image to at most `k` colours.

pub mod kmeans;

pub use kmeans::{kmeans, ClusterAssignment, KMeansParams, Sample};

use crate::error::Result;
use crate::image::{Bgr, ImageView, RasterImage};
use log::debug;

/// Reinterpret a raster as `width * height` colour samples.
pub fn raster_samples(src: &RasterImage) -> Vec<Sample> {
    src.pixels()
        .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
        .collect()
}

fn center_color(c: &Sample) -> Bgr {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Bgr::new(q(c[0]), q(c[1]), q(c[2]))
}

/// Replace each pixel by the colour of its k-means centroid.
pub fn kmeans_quantize(src: &RasterImage, params: &KMeansParams) -> Result<RasterImage> {
    src.ensure_non_empty()?;
    let samples = raster_samples(src);
    let clusters = kmeans(&samples, params)?;
    debug!(
        "k-means segmentation {}x{}: {} populated clusters, compactness={:.1}",
        src.width(),
        src.height(),
        clusters.populated_clusters(),
        clusters.compactness
    );
    let palette: Vec<Bgr> = clusters.centers.iter().map(center_color).collect();
    let mut out = RasterImage::new(src.width(), src.height());
    for (i, &label) in clusters.labels.iter().enumerate() {
        out.set_pixel(i % src.width(), i / src.width(), palette[label]);
    }
    Ok(out)
}

#![doc = include_str!("../README.md")]

// Public modules
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod registry;

// Kernels and the building blocks they share.
pub mod color;
pub mod contours;
pub mod draw;
pub mod edges;
pub mod features;
pub mod filters;
pub mod flow;
pub mod hough;
pub mod segment;
pub mod spectrum;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{CatalogError, Result};
pub use crate::image::{Bgr, GrayImage, RasterImage};
pub use crate::registry::{
    ExecutionReport, KernelParams, Operation, RegistryConfig, TransformRegistry,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use vision_catalog::prelude::*;
///
/// # fn main() -> vision_catalog::Result<()> {
/// let registry = TransformRegistry::new();
/// let input = RasterImage::filled(64, 64, Bgr::gray(128));
/// let bytes = vision_catalog::image::codec::encode(&input)?;
/// let blurred = registry.execute("Gaussian Blur", &bytes)?;
/// println!("{} bytes of BMP", blurred.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Bgr, RasterImage};
    pub use crate::{CatalogError, Operation, RegistryConfig, TransformRegistry};
}

//! Transform registry: operation names to kernels.
//!
//! The registry resolves a public operation name to an [`Operation`],
//! decodes the input bytes, runs the kernel and encodes the result as BMP.
//! Unknown or disabled names fail before any decoding happens. All kernels
//! are pure except optical flow, whose previous-frame cache lives behind a
//! mutex owned by the registry.

pub mod operation;
pub mod params;

pub use operation::Operation;
pub use params::{KernelParams, RegistryConfig};

use crate::color::equalize_histogram;
use crate::contours::contour_drawing;
use crate::diagnostics::TimingBreakdown;
use crate::edges::canny_edges;
use crate::error::{CatalogError, Result};
use crate::features::orb_drawing;
use crate::filters::{gaussian_blur, median_blur};
use crate::flow::{optical_flow, FrameCache};
use crate::hough::circle_drawing;
use crate::image::codec::{decode, encode};
use crate::image::{ImageView, RasterImage};
use crate::segment::kmeans_quantize;
use crate::spectrum::power_spectrum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Summary of one byte-level request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub operation: Operation,
    pub width: usize,
    pub height: usize,
    pub timing: TimingBreakdown,
}

#[derive(Debug)]
pub struct TransformRegistry {
    operations: Vec<Operation>,
    params: KernelParams,
    flow_cache: Mutex<FrameCache>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistry {
    /// Registry with the default operation set and default parameters.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            operations: config.enabled_operations(),
            params: config.params,
            flow_cache: Mutex::new(FrameCache::new()),
        }
    }

    /// Registered operation names in catalog order.
    pub fn list_operations(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    /// Resolve a public name to a registered operation.
    pub fn resolve(&self, name: &str) -> Result<Operation> {
        match Operation::from_name(name) {
            Some(op) if self.contains(op) => Ok(op),
            _ => Err(CatalogError::UnknownOperation(name.to_string())),
        }
    }

    /// Decode, transform and re-encode.
    pub fn execute(&self, name: &str, input: &[u8]) -> Result<Vec<u8>> {
        self.execute_with_report(name, input).map(|(bytes, _)| bytes)
    }

    /// Like [`execute`](Self::execute) but also returns stage timings.
    pub fn execute_with_report(&self, name: &str, input: &[u8]) -> Result<(Vec<u8>, ExecutionReport)> {
        let op = self.resolve(name)?;
        let mut timing = TimingBreakdown::default();
        let raster = timing.time("decode", || decode(input))?;
        let (width, height) = (raster.width(), raster.height());
        let output = timing.time("kernel", || self.apply(op, raster))?;
        let bytes = timing.time("encode", || encode(&output))?;
        debug!(
            "{} on {}x{}: {:.2} ms total",
            op, width, height, timing.total_ms
        );
        Ok((
            bytes,
            ExecutionReport {
                operation: op,
                width,
                height,
                timing,
            },
        ))
    }

    /// Run a registered kernel directly on a raster.
    pub fn apply(&self, op: Operation, src: RasterImage) -> Result<RasterImage> {
        if !self.contains(op) {
            return Err(CatalogError::UnknownOperation(op.name().to_string()));
        }
        src.ensure_non_empty()?;
        let start = Instant::now();
        let (w, h) = (src.width(), src.height());
        let p = &self.params;
        let out = match op {
            Operation::TestLoop => Ok(src),
            Operation::CannyEdgeDetection => canny_edges(&src, &p.canny),
            Operation::OpticalFlow => {
                let mut cache = self
                    .flow_cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                optical_flow(&mut cache, &src, &p.flow)
            }
            Operation::ContourAndShape => contour_drawing(&src, &p.contours),
            Operation::KMeans => kmeans_quantize(&src, &p.kmeans),
            Operation::GaussianBlur => gaussian_blur(&src, &p.gaussian),
            Operation::MedianBlur => median_blur(&src, &p.median),
            Operation::Histogram => Ok(equalize_histogram(&src)),
            Operation::OrbFeatures => orb_drawing(&src, &p.orb),
            Operation::DetectCircles => circle_drawing(src, &p.hough),
            Operation::Dft => power_spectrum(&src),
        }?;
        debug!(
            "kernel {} {}x{} in {:.2} ms",
            op,
            w,
            h,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(out)
    }

    /// Forget the previous optical-flow frame.
    pub fn reset_flow(&self) {
        self.flow_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
    }
}

#[cfg(test)]
mod tests;

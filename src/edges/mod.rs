//! Edge processing: Sobel gradients, direction-aligned non-maximum
//! suppression and Canny hysteresis.
//!
//! - Gradients clamp at the borders (replicate) and expose `gx`, `gy` and a
//!   magnitude in either L1 or L2 norm.
//! - Suppression keeps single-pixel ridges and never touches the outer frame.
//! - Hysteresis grows 8-connected edges from strong seeds through weak ridges.
//!
//! The circle detector reuses the gradients and the binary Canny map.

pub mod canny;
pub mod grad;
pub mod nms;

pub use canny::{canny, canny_edges, CannyParams};
pub use grad::{sobel_gradients, Grad, MagnitudeNorm};
pub use nms::suppress_non_maxima;

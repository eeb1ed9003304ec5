pub mod codec;
pub mod f32;
pub mod gray;
pub mod raster;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::gray::{BinaryMask, GrayImage};
pub use self::raster::{Bgr, RasterImage, RASTER_CHANNELS};
pub use self::traits::{ImageView, ImageViewMut};

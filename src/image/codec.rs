//! Codec adapter between container bytes and [`RasterImage`].
//!
//! - `decode`: any container the `image` crate recognises (BMP, PNG, JPEG)
//!   into a BGR raster; alpha is dropped.
//! - `encode`: a raster into an uncompressed 24-bit BMP, which is lossless.
//! - `load_image` / `save_image` / `write_json_file`: file helpers for tools.
use super::raster::{RasterImage, RASTER_CHANNELS};
use crate::error::{CatalogError, Result};
use image::{ImageFormat, RgbImage};
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Decode container bytes into a BGR raster.
pub fn decode(bytes: &[u8]) -> Result<RasterImage> {
    if bytes.is_empty() {
        return Err(CatalogError::DecodeFailure("empty input".to_string()));
    }
    let rgb = image::load_from_memory(bytes)
        .map_err(|e| CatalogError::DecodeFailure(e.to_string()))?
        .into_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let mut data = rgb.into_raw();
    swap_red_blue(&mut data);
    let raster = RasterImage::from_raw(w, h, data)?;
    raster
        .ensure_non_empty()
        .map_err(|e| CatalogError::DecodeFailure(e.to_string()))?;
    Ok(raster)
}

/// Encode a raster as BMP bytes.
pub fn encode(raster: &RasterImage) -> Result<Vec<u8>> {
    encode_as(raster, ImageFormat::Bmp)
}

/// Encode a raster into an arbitrary container supported by the `image` crate.
pub fn encode_as(raster: &RasterImage, format: ImageFormat) -> Result<Vec<u8>> {
    raster.ensure_non_empty()?;
    let mut data = raster.as_bytes().to_vec();
    swap_red_blue(&mut data);
    let rgb = RgbImage::from_raw(raster.width_u32(), raster.height_u32(), data)
        .ok_or_else(|| CatalogError::EncodeFailure("raster size mismatch".to_string()))?;
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, format)
        .map_err(|e| CatalogError::EncodeFailure(e.to_string()))?;
    Ok(out.into_inner())
}

/// Read an image file from disk into a raster.
pub fn load_image(path: &Path) -> Result<RasterImage> {
    let bytes = fs::read(path)
        .map_err(|e| CatalogError::Io(format!("failed to read {}: {e}", path.display())))?;
    decode(&bytes)
}

/// Save a raster, choosing the container from the file extension (BMP when
/// the extension is missing or unknown).
pub fn save_image(raster: &RasterImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Bmp);
    let bytes = encode_as(raster, format)?;
    fs::write(path, bytes)
        .map_err(|e| CatalogError::Io(format!("failed to write {}: {e}", path.display())))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        CatalogError::Io(format!("failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)
        .map_err(|e| CatalogError::Io(format!("failed to write JSON {}: {e}", path.display())))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Io(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

fn swap_red_blue(data: &mut [u8]) {
    for px in data.chunks_exact_mut(RASTER_CHANNELS) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Bgr, ImageView};

    fn gradient_raster(w: usize, h: usize) -> RasterImage {
        RasterImage::from_fn(w, h, |x, y| {
            Bgr::new((x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8)
        })
    }

    #[test]
    fn bmp_round_trip_is_lossless() {
        let src = gradient_raster(17, 9);
        let bytes = encode(&src).unwrap();
        assert_eq!(&bytes[..2], b"BM");
        let back = decode(&bytes).unwrap();
        assert_eq!(back.width(), 17);
        assert_eq!(back.height(), 9);
        assert_eq!(back, src);
    }

    #[test]
    fn png_round_trip_preserves_channel_order() {
        let mut src = RasterImage::new(2, 1);
        src.set_pixel(0, 0, Bgr::RED);
        let bytes = encode_as(&src, ImageFormat::Png).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back.pixel(0, 0), Bgr::RED);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CatalogError::DecodeFailure(_)));
        assert!(matches!(decode(&[]), Err(CatalogError::DecodeFailure(_))));
    }

    #[test]
    fn encoding_empty_raster_is_invalid() {
        let err = encode(&RasterImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameters(_)));
    }
}

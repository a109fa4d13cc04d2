use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};

use crate::core::error::{AppError, Result};
use crate::features::capture::camera::Frame;

/// Encode an RGBA frame as JPEG at `quality` (1-100).
///
/// JPEG has no alpha channel; it is dropped before encoding.
pub fn encode_jpeg(frame: Frame, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = (frame.width, frame.height);
    let raster = RgbaImage::from_raw(width, height, frame.rgba).ok_or_else(|| {
        AppError::Internal(format!(
            "Frame buffer does not match {}x{} RGBA",
            width, height
        ))
    })?;
    let rgb = DynamicImage::ImageRgba8(raster).to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|e| AppError::Internal(format!("Failed to encode JPEG: {}", e)))?;

    Ok(out)
}

/// [`encode_jpeg`] on the blocking pool
pub async fn encode_jpeg_blocking(frame: Frame, quality: u8) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || encode_jpeg(frame, quality))
        .await
        .map_err(|e| AppError::Internal(format!("Encoder task failed: {}", e)))?
}

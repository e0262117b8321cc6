//! JPEG encoding for the wire.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use super::error::CaptureError;

/// Encode a captured frame as JPEG bytes at the given quality (1-100).
///
/// The endpoint expects plain JPEG; base64 wrapping happens at the
/// client, not here.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));

    // JPEG has no alpha; flatten first so RGBA sources encode cleanly.
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| CaptureError::EncodeFailed(e.to_string()))?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn encodes_valid_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([120, 40, 200])));
        let bytes = encode_jpeg(&img, 80).unwrap();
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        // Decodes back to the same dimensions.
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn quality_is_clamped() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0])));
        assert!(encode_jpeg(&img, 0).is_ok());
        assert!(encode_jpeg(&img, 255).is_ok());
    }
}

//! JPEG encoding for crop output.
//!
//! JPEG has no alpha channel, so the RGBA surface is composited over an
//! opaque background color before encoding. Uncovered corners of a rotated
//! crop become that background.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate_rgba, EncodeError};

/// Background transparent pixels are flattened onto.
pub const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Encode RGBA pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_alpha(pixels, JPEG_BACKGROUND);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Composite straight-alpha RGBA over an opaque background, returning RGB.
fn flatten_alpha(pixels: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);

    for px in pixels.chunks_exact(4) {
        let alpha = px[3] as u32;
        for channel in 0..3 {
            let fg = px[channel] as u32;
            let bg = background[channel] as u32;
            // Integer blend with rounding
            let v = (fg * alpha + bg * (255 - alpha) + 127) / 255;
            rgb.push(v as u8);
        }
    }

    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! PNG encoding for crop output.
//!
//! PNG is the default output: lossless, keeps the transparent corners of a
//! rotated crop, and byte-for-byte deterministic for identical pixels.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

use super::{validate_rgba, EncodeError};

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgba(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());

    // Pinned settings: output bytes must be reproducible
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        CompressionType::Default,
        FilterType::Adaptive,
    );

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "PNG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! Output encoding for rasterized crops.
//!
//! This module provides functionality for:
//! - Encoding RGBA surfaces to PNG (lossless, default)
//! - Encoding RGBA surfaces to JPEG with configurable quality, flattening
//!   transparency onto an opaque background
//!
//! Both encoders are deterministic: identical pixels produce identical bytes.
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::encode::{encode_rgba, OutputFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let png = encode_rgba(&pixels, 100, 100, OutputFormat::Png).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod jpeg;
mod png;

pub use jpeg::{encode_jpeg, JPEG_BACKGROUND};
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default JPEG quality when the host does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputFormat {
    /// Lossless PNG, keeps transparency.
    #[default]
    Png,
    /// JPEG at the given quality (1-100, clamped).
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// JPEG at the default quality.
    pub fn jpeg() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Encode RGBA pixel data in the requested format.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Png => encode_png(pixels, width, height),
        OutputFormat::Jpeg { quality } => encode_jpeg(pixels, width, height, quality),
    }
}

/// Check dimensions and RGBA buffer length before handing off to an encoder.
pub(crate) fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .unwrap_or(usize::MAX);
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::jpeg().mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }

    #[test]
    fn test_encode_rgba_dispatch() {
        let pixels = vec![200u8; 8 * 8 * 4];

        let png = encode_rgba(&pixels, 8, 8, OutputFormat::Png).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let jpeg = encode_rgba(&pixels, 8, 8, OutputFormat::Jpeg { quality: 80 }).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_validate_rgba() {
        assert!(validate_rgba(&[0u8; 16], 2, 2).is_ok());
        assert!(matches!(
            validate_rgba(&[0u8; 12], 2, 2),
            Err(EncodeError::InvalidPixelData { expected: 16, actual: 12 })
        ));
        assert!(matches!(
            validate_rgba(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::EncodingFailed {
            format: "PNG",
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "PNG encoding failed: boom");
    }
}

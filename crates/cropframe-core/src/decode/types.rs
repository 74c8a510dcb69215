//! Core types for source image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::viewport::SourceImageSize;

/// Bytes per RGBA8 pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Error types for source image decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a recognized or enabled image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// A raw pixel buffer does not match its stated dimensions.
    #[error("Invalid pixel data: expected {expected} bytes for {width}x{height}, got {actual}")]
    InvalidPixelData {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded source image with RGBA8 pixel data.
///
/// This is the pixel buffer the crop rasterizer samples from. Its
/// dimensions are the image's natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

fn expected_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
}

impl SourceImage {
    /// Create a SourceImage from RGBA pixel data, validating the buffer size.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        match expected_len(width, height, RGBA_CHANNELS) {
            Some(expected) if expected == pixels.len() => Ok(Self {
                width,
                height,
                pixels,
            }),
            expected => Err(DecodeError::InvalidPixelData {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: pixels.len(),
            }),
        }
    }

    /// Create a fully opaque SourceImage from RGB pixel data.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self, DecodeError> {
        match expected_len(width, height, 3) {
            Some(expected) if expected == rgb.len() => {}
            expected => {
                return Err(DecodeError::InvalidPixelData {
                    width,
                    height,
                    expected: expected.unwrap_or(usize::MAX),
                    actual: rgb.len(),
                })
            }
        }

        let pixels = rgb
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a SourceImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Natural size for the viewport controller.
    pub fn size(&self) -> SourceImageSize {
        SourceImageSize::new(self.width as f64, self.height as f64)
    }

    /// Read the RGBA pixel at `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

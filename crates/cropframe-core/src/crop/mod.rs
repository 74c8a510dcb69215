//! Crop extraction with optional rotation.
//!
//! This module provides functionality for:
//! - Describing crop regions in source-pixel coordinates
//! - Rasterizing a region rotated about its center onto a transparent
//!   surface sized to the rotated bounding box
//! - Encoding the surface to PNG or JPEG
//! - Rejecting overlapping crop operations
//!
//! The output surface is independent of the live viewport: zoom and pan
//! never affect which pixels are extracted.
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::crop::{CropRegion, Rasterizer, SoftwareRasterizer};
//! use cropframe_core::geometry::RotationAngle;
//!
//! let rasterizer = SoftwareRasterizer::default();
//! let region = CropRegion::new(0, 0, 100, 100);
//! let output = rasterizer.rasterize(&source, region, RotationAngle::new(45.0))?;
//! assert_eq!((output.width(), output.height()), (142, 142));
//! ```

mod gate;
mod raster;
mod region;

pub use gate::{CropGate, CropPermit};
pub use raster::{InterpolationFilter, SoftwareRasterizer};
pub use region::{CropInputError, CropRegion, CropRequest};

use thiserror::Error;

use crate::decode::SourceImage;
use crate::encode::EncodeError;
use crate::geometry::RotationAngle;

/// Errors that can occur during a crop operation.
#[derive(Debug, Error)]
pub enum CropError {
    /// The request or source image was rejected before rendering
    #[error("invalid crop input: {0}")]
    Input(#[from] CropInputError),

    /// The output surface could not be created
    #[error("rasterization failed: {0}")]
    Rasterization(String),

    /// The surface could not be encoded
    #[error(transparent)]
    Encoding(#[from] EncodeError),

    /// Another crop operation is still in flight
    #[error("a crop operation is already in progress")]
    Busy,
}

/// An encoded crop result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    bytes: Vec<u8>,
    mime_type: &'static str,
    width: u32,
    height: u32,
}

impl OutputImage {
    pub fn new(bytes: Vec<u8>, mime_type: &'static str, width: u32, height: u32) -> Self {
        Self {
            bytes,
            mime_type,
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Renders a rotated crop of a source image to an encoded output.
///
/// [`SoftwareRasterizer`] is the built-in implementation. Hosts with a GPU
/// or native canvas can provide their own.
pub trait Rasterizer {
    fn rasterize(
        &self,
        source: &SourceImage,
        region: CropRegion,
        rotation: RotationAngle,
    ) -> Result<OutputImage, CropError>;
}

/// Rasterize `request` against `source` with the given rasterizer.
pub fn crop_image<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    source: &SourceImage,
    request: CropRequest,
) -> Result<OutputImage, CropError> {
    rasterizer.rasterize(source, request.region, request.rotation)
}

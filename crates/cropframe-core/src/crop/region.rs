//! Crop regions in source-pixel coordinates.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel of the source image
//! - `x + width <= natural_width` and `y + height <= natural_height`
//! - Regions are independent of the live viewport transform

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::RotationAngle;

/// Reasons a crop request is rejected before any rasterization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropInputError {
    /// Width or height is zero
    #[error("crop region must have positive size, got {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    /// Region extends past the source image
    #[error("crop region {region} exceeds source bounds {source_width}x{source_height}")]
    OutOfBounds {
        region: CropRegion,
        source_width: u32,
        source_height: u32,
    },

    /// Source pixel buffer does not match its dimensions
    #[error("source pixel buffer has {actual} bytes, expected {expected}")]
    InvalidSource { expected: usize, actual: usize },
}

/// A rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole `width x height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Build a region from normalized coordinates (0.0 to 1.0) relative to
    /// an image of `image_width x image_height`.
    ///
    /// Values are clamped into the image and rounded to whole pixels; the
    /// result is at least 1x1 for a non-empty image.
    pub fn from_normalized(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let unit = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        let src_w = image_width as f64;
        let src_h = image_height as f64;

        let px_left = ((unit(left) * src_w).round() as u32).min(image_width.saturating_sub(1));
        let px_top = ((unit(top) * src_h).round() as u32).min(image_height.saturating_sub(1));
        let px_width = (unit(width) * src_w).round() as u32;
        let px_height = (unit(height) * src_h).round() as u32;

        let px_right = px_left.saturating_add(px_width).min(image_width);
        let px_bottom = px_top.saturating_add(px_height).min(image_height);

        let min_side = |len: u32, image_len: u32| if image_len == 0 { 0 } else { len.max(1) };

        Self {
            x: px_left,
            y: px_top,
            width: min_side(px_right.saturating_sub(px_left), image_width),
            height: min_side(px_bottom.saturating_sub(px_top), image_height),
        }
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// Check that the region is non-empty and lies inside a
    /// `source_width x source_height` image.
    pub fn validate(&self, source_width: u32, source_height: u32) -> Result<(), CropInputError> {
        if self.width == 0 || self.height == 0 {
            return Err(CropInputError::EmptyRegion {
                width: self.width,
                height: self.height,
            });
        }

        let fits_x = self.right().is_some_and(|r| r <= source_width);
        let fits_y = self.bottom().is_some_and(|b| b <= source_height);
        if !fits_x || !fits_y {
            return Err(CropInputError::OutOfBounds {
                region: *self,
                source_width,
                source_height,
            });
        }

        Ok(())
    }
}

/// A crop commit: the region plus the rotation to apply on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRequest {
    pub region: CropRegion,
    #[serde(default)]
    pub rotation: RotationAngle,
}

impl CropRequest {
    pub fn new(region: CropRegion, rotation_degrees: f64) -> Self {
        Self {
            region,
            rotation: RotationAngle::new(rotation_degrees),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! Geometry helpers shared by the viewport controller and the crop rasterizer.
//!
//! Everything here is a pure function over `f64` values. Angles are in
//! degrees at the API surface and converted to radians internally.
//!
//! # Rotated bounding box
//!
//! For a `w x h` rectangle rotated by θ, the smallest axis-aligned rectangle
//! containing it is:
//! ```text
//! bbox_w = |cos θ|·w + |sin θ|·h
//! bbox_h = |sin θ|·w + |cos θ|·h
//! ```

use serde::{Deserialize, Serialize};

/// Floating noise below this is discarded before rounding a canvas size up.
///
/// `cos(90°)` evaluates to ~6e-17, which would otherwise push an exact
/// integer bounding box over the next integer.
const CANVAS_ROUNDING_EPSILON: f64 = 1e-9;

/// A width/height pair in continuous units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in container-local or display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Compute the axis-aligned bounding box of a `width x height` rectangle
/// rotated by `rotation_degrees` around its center.
///
/// The result is continuous; use [`canvas_dimensions`] to turn it into a
/// pixel surface size.
pub fn rotated_bounding_box(width: f64, height: f64, rotation_degrees: f64) -> Size {
    let theta = to_radians(rotation_degrees);
    let cos = theta.cos().abs();
    let sin = theta.sin().abs();

    Size {
        width: cos * width + sin * height,
        height: sin * width + cos * height,
    }
}

/// Round a continuous bounding box up to whole pixels.
///
/// Always rounds up so the rotated content is never clipped, ignoring
/// sub-epsilon noise from the trigonometry. Each axis is at least 1.
pub fn canvas_dimensions(bounds: Size) -> (u32, u32) {
    (ceil_axis(bounds.width), ceil_axis(bounds.height))
}

fn ceil_axis(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 1;
    }
    let ceiled = (value - CANVAS_ROUNDING_EPSILON).ceil();
    // `as` saturates at u32::MAX, the surface allocation rejects it later
    (ceiled as u32).max(1)
}

/// A rotation angle in degrees, normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct RotationAngle(f64);

impl RotationAngle {
    /// Create a normalized angle. Non-finite input becomes 0°.
    pub fn new(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self(0.0);
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can return exactly 360.0 for tiny negative inputs
        if normalized >= 360.0 {
            Self(0.0)
        } else {
            Self(normalized)
        }
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        to_radians(self.0)
    }
}

impl From<f64> for RotationAngle {
    fn from(degrees: f64) -> Self {
        Self::new(degrees)
    }
}

impl From<RotationAngle> for f64 {
    fn from(angle: RotationAngle) -> Self {
        angle.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_to_radians() {
        assert_close(to_radians(180.0), std::f64::consts::PI, 1e-12);
        assert_close(to_radians(90.0), std::f64::consts::FRAC_PI_2, 1e-12);
        assert_eq!(to_radians(0.0), 0.0);
    }

    #[test]
    fn test_bounding_box_no_rotation() {
        let bbox = rotated_bounding_box(100.0, 50.0, 0.0);
        assert_eq!(bbox, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_bounding_box_90_degrees_swaps() {
        let bbox = rotated_bounding_box(100.0, 50.0, 90.0);
        assert_close(bbox.width, 50.0, 1e-9);
        assert_close(bbox.height, 100.0, 1e-9);
    }

    #[test]
    fn test_bounding_box_45_degrees_square() {
        let bbox = rotated_bounding_box(100.0, 100.0, 45.0);
        assert_close(bbox.width, 141.42, 0.01);
        assert_close(bbox.height, 141.42, 0.01);
    }

    #[test]
    fn test_bounding_box_180_and_270() {
        let bbox = rotated_bounding_box(100.0, 50.0, 180.0);
        assert_close(bbox.width, 100.0, 1e-9);
        assert_close(bbox.height, 50.0, 1e-9);

        let bbox = rotated_bounding_box(100.0, 50.0, 270.0);
        assert_close(bbox.width, 50.0, 1e-9);
        assert_close(bbox.height, 100.0, 1e-9);
    }

    #[test]
    fn test_bounding_box_negative_matches_positive() {
        let a = rotated_bounding_box(100.0, 80.0, 30.0);
        let b = rotated_bounding_box(100.0, 80.0, -30.0);
        assert_close(a.width, b.width, 1e-9);
        assert_close(a.height, b.height, 1e-9);
    }

    #[test]
    fn test_canvas_dimensions_round_up() {
        let bbox = rotated_bounding_box(100.0, 100.0, 45.0);
        assert_eq!(canvas_dimensions(bbox), (142, 142));
    }

    #[test]
    fn test_canvas_dimensions_ignores_trig_noise() {
        // cos(90°) is not exactly zero in floating point
        let bbox = rotated_bounding_box(100.0, 50.0, 90.0);
        assert_eq!(canvas_dimensions(bbox), (50, 100));

        let bbox = rotated_bounding_box(640.0, 480.0, 270.0);
        assert_eq!(canvas_dimensions(bbox), (480, 640));
    }

    #[test]
    fn test_canvas_dimensions_degenerate() {
        assert_eq!(canvas_dimensions(Size::new(0.0, -3.0)), (1, 1));
        assert_eq!(canvas_dimensions(Size::new(f64::NAN, f64::INFINITY)), (1, 1));
        assert_eq!(canvas_dimensions(Size::new(0.2, 1.0)), (1, 1));
    }

    #[test]
    fn test_rotation_angle_normalization() {
        assert_eq!(RotationAngle::new(0.0).degrees(), 0.0);
        assert_eq!(RotationAngle::new(360.0).degrees(), 0.0);
        assert_eq!(RotationAngle::new(450.0).degrees(), 90.0);
        assert_eq!(RotationAngle::new(-90.0).degrees(), 270.0);
        assert_eq!(RotationAngle::new(-720.0).degrees(), 0.0);
        assert_eq!(RotationAngle::new(f64::NAN).degrees(), 0.0);
        assert_eq!(RotationAngle::new(f64::NEG_INFINITY).degrees(), 0.0);
    }

    #[test]
    fn test_rotation_angle_tiny_negative() {
        let angle = RotationAngle::new(-1e-20);
        assert!(angle.degrees() >= 0.0 && angle.degrees() < 360.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

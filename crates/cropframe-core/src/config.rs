//! Engine configuration.
//!
//! All structs deserialize with `#[serde(default)]`, so a host can send a
//! partial object and get defaults for the rest. Field names are camelCase
//! on the wire (`maxScale`, `maxCanvasPixels`), like the viewport types. Call
//! [`EngineConfig::sanitized`] on untrusted input before handing it to the
//! controller or rasterizer.

use serde::{Deserialize, Serialize};

use crate::crop::InterpolationFilter;
use crate::encode::OutputFormat;

/// Smallest allowed zoom scale (1.0 = image fitted inside the container).
pub const DEFAULT_MIN_SCALE: f64 = 1.0;
/// Largest allowed zoom scale.
pub const DEFAULT_MAX_SCALE: f64 = 10.0;
/// Multiplier applied per wheel notch.
pub const DEFAULT_WHEEL_FACTOR: f64 = 1.1;
/// Multiplier applied per zoom-in / zoom-out button press.
pub const DEFAULT_STEP_FACTOR: f64 = 1.5;
/// Largest output surface the software rasterizer will allocate (64 MP).
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Zoom limits and step factors for the transform controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    /// Lower scale bound (1.0 keeps the image at least "fit" size)
    pub min_scale: f64,
    /// Upper scale bound
    pub max_scale: f64,
    /// Wheel zoom multiplier (> 1)
    pub wheel_factor: f64,
    /// Button zoom multiplier (> 1)
    pub step_factor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            wheel_factor: DEFAULT_WHEEL_FACTOR,
            step_factor: DEFAULT_STEP_FACTOR,
        }
    }
}

impl ZoomConfig {
    /// Repair values that would break the clamping invariants.
    ///
    /// Each field falls back to its default when it is non-finite or out of
    /// range; `min_scale > max_scale` resets both bounds.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();

        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let factor = |v: f64, fallback: f64| if v.is_finite() && v > 1.0 { v } else { fallback };

        let mut min_scale = positive(self.min_scale, defaults.min_scale);
        let mut max_scale = positive(self.max_scale, defaults.max_scale);
        if min_scale > max_scale {
            min_scale = defaults.min_scale;
            max_scale = defaults.max_scale;
        }

        Self {
            min_scale,
            max_scale,
            wheel_factor: factor(self.wheel_factor, defaults.wheel_factor),
            step_factor: factor(self.step_factor, defaults.step_factor),
        }
    }
}

/// Settings for the crop rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Resampling filter for rotated output
    pub filter: InterpolationFilter,
    /// Output encoding
    pub format: OutputFormat,
    /// Surface size limit in pixels
    pub max_canvas_pixels: u64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::default(),
            format: OutputFormat::default(),
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
        }
    }
}

impl CropConfig {
    pub fn sanitized(self) -> Self {
        Self {
            max_canvas_pixels: if self.max_canvas_pixels == 0 {
                DEFAULT_MAX_CANVAS_PIXELS
            } else {
                self.max_canvas_pixels
            },
            ..self
        }
    }
}

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub zoom: ZoomConfig,
    pub crop: CropConfig,
}

impl EngineConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with every out-of-range value replaced by its default.
    pub fn sanitized(self) -> Self {
        Self {
            zoom: self.zoom.sanitized(),
            crop: self.crop.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_defaults() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.min_scale, 1.0);
        assert_eq!(zoom.max_scale, 10.0);
        assert_eq!(zoom.wheel_factor, 1.1);
        assert_eq!(zoom.step_factor, 1.5);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let mut config = EngineConfig::new();
        config.zoom.max_scale = 4.0;
        config.crop.max_canvas_pixels = 1000;
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_sanitized_repairs_inverted_bounds() {
        let mut zoom = ZoomConfig::default();
        zoom.min_scale = 8.0;
        zoom.max_scale = 2.0;
        let fixed = zoom.sanitized();
        assert_eq!(fixed.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(fixed.max_scale, DEFAULT_MAX_SCALE);
    }

    #[test]
    fn test_sanitized_repairs_bad_factors() {
        let mut zoom = ZoomConfig::default();
        zoom.wheel_factor = 0.5;
        zoom.step_factor = f64::NAN;
        zoom.min_scale = -1.0;
        let fixed = zoom.sanitized();
        assert_eq!(fixed.wheel_factor, DEFAULT_WHEEL_FACTOR);
        assert_eq!(fixed.step_factor, DEFAULT_STEP_FACTOR);
        assert_eq!(fixed.min_scale, DEFAULT_MIN_SCALE);
    }

    #[test]
    fn test_sanitized_repairs_zero_pixel_budget() {
        let mut crop = CropConfig::default();
        crop.max_canvas_pixels = 0;
        assert_eq!(crop.sanitized().max_canvas_pixels, DEFAULT_MAX_CANVAS_PIXELS);
    }

    #[test]
    fn test_partial_camel_case_config() {
        let json = r#"{
            "zoom": { "maxScale": 4.0, "wheelFactor": 1.25 },
            "crop": { "maxCanvasPixels": 1000, "format": { "type": "jpeg", "quality": 70 } }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.zoom.max_scale, 4.0);
        assert_eq!(config.zoom.wheel_factor, 1.25);
        assert_eq!(config.zoom.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(config.crop.max_canvas_pixels, 1000);
        assert_eq!(config.crop.format, OutputFormat::Jpeg { quality: 70 });
        assert_eq!(config.crop.filter, InterpolationFilter::Bilinear);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let value = serde_json::to_value(EngineConfig::default()).unwrap();
        for key in ["minScale", "maxScale", "wheelFactor", "stepFactor"] {
            assert!(value["zoom"].get(key).is_some(), "zoom.{key}");
        }
        assert!(value["crop"].get("maxCanvasPixels").is_some());
        assert!(value["zoom"].get("max_scale").is_none());
    }
}

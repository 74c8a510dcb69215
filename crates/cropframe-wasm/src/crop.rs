//! WASM bindings for rotated crop extraction.
//!
//! A [`JsCropper`] owns a configured rasterizer and the busy flag that
//! allows one crop in flight. The output is encoded bytes ready for a
//! `Blob`; the live viewport transform plays no part in it.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper();
//! if (!cropper.is_busy) {
//!   const out = cropper.crop(image, 120, 80, 400, 300, rotation);
//!   upload(new Blob([out.bytes()], { type: out.mime_type }));
//! }
//! ```

use cropframe_core::crop::{CropGate, CropRegion, CropRequest, OutputImage, SoftwareRasterizer};
use cropframe_core::geometry;
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::{config_from_js, JsSourceImage};

/// An encoded crop result.
#[wasm_bindgen]
pub struct JsOutputImage {
    inner: OutputImage,
}

#[wasm_bindgen]
impl JsOutputImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// Encoded bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes().to_vec()
    }
}

/// Crop extractor with a single-flight guard.
#[wasm_bindgen]
pub struct JsCropper {
    rasterizer: SoftwareRasterizer,
    gate: CropGate,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper with default settings (bilinear, PNG output).
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCropper {
        Self {
            rasterizer: SoftwareRasterizer::default(),
            gate: CropGate::new(),
        }
    }

    /// Create a cropper from an engine config object (only `crop` is used).
    pub fn with_config(config: JsValue) -> Result<JsCropper, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self {
            rasterizer: SoftwareRasterizer::new(config.crop),
            gate: CropGate::new(),
        })
    }

    /// True while a crop is running.
    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Crop a region given in source pixels, rotated by `rotation_degrees`
    /// (clockwise) about its center.
    ///
    /// The output is `ceil` of the rotated bounding box; corners not covered
    /// by the rotated crop are transparent (PNG) or white (JPEG).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The region is empty or extends past the image
    /// - The output surface is too large
    /// - Encoding fails
    /// - Another crop is in progress
    pub fn crop(
        &self,
        image: &JsSourceImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rotation_degrees: f64,
    ) -> Result<JsOutputImage, JsValue> {
        let request = CropRequest::new(CropRegion::new(x, y, width, height), rotation_degrees);
        self.run(image, request)
    }

    /// Crop a region given in normalized coordinates (0.0 to 1.0 of the
    /// image size). Out-of-range values are clamped into the image.
    pub fn crop_normalized(
        &self,
        image: &JsSourceImage,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        rotation_degrees: f64,
    ) -> Result<JsOutputImage, JsValue> {
        let source = image.as_source();
        let region =
            CropRegion::from_normalized(left, top, width, height, source.width, source.height);
        self.run(image, CropRequest::new(region, rotation_degrees))
    }
}

impl Default for JsCropper {
    fn default() -> Self {
        Self::new()
    }
}

impl JsCropper {
    fn run(&self, image: &JsSourceImage, request: CropRequest) -> Result<JsOutputImage, JsValue> {
        self.gate
            .run(&self.rasterizer, image.as_source(), request)
            .map(|inner| JsOutputImage { inner })
            .map_err(to_js_error)
    }
}

/// Axis-aligned bounding box of a `width x height` rectangle rotated by
/// `rotation_degrees`, as `[width, height]`.
#[wasm_bindgen]
pub fn rotated_bounding_box(width: f64, height: f64, rotation_degrees: f64) -> Vec<f64> {
    let bounds = geometry::rotated_bounding_box(width, height, rotation_degrees);
    vec![bounds.width, bounds.height]
}

/// Pixel size of the crop output for a `width x height` region rotated by
/// `rotation_degrees`, as `[width, height]`. Lets the UI preview the
/// output size before committing.
#[wasm_bindgen]
pub fn canvas_size(width: u32, height: u32, rotation_degrees: f64) -> Vec<u32> {
    let bounds = geometry::rotated_bounding_box(width as f64, height as f64, rotation_degrees);
    let (w, h) = geometry::canvas_dimensions(bounds);
    vec![w, h]
}
